//! Agent hook used by the native loading tests.
//!
//! Accepts every forwarded command unless `reject` is set, in which case it
//! refuses commands whose URL contains `reject_url`.

use hookhost_sdk::prelude::*;

#[derive(Debug, Default, Serialize, Deserialize)]
struct EchoSettings {
    reject: bool,
    reject_url: String,
}

struct EchoCarrier {
    settings: EchoSettings,
}

impl CalloutCarrier for EchoCarrier {
    fn close(&mut self) -> Result<(), HookError> {
        Ok(())
    }

    fn as_before_forward_to_server(
        &self,
    ) -> Option<&(dyn BeforeForwardToServerCallouts + 'static)> {
        Some(self)
    }
}

impl BeforeForwardToServerCallouts for EchoCarrier {
    fn on_before_forward_to_server(&self, request: &ForwardToServerRequest) -> Result<(), HookError> {
        if self.settings.reject && request.url.contains(&self.settings.reject_url) {
            return Err(HookError::failed(format!("echo hook rejected {}", request.url)));
        }
        Ok(())
    }
}

fn load(settings: Option<HookSettings>) -> Result<Box<dyn CalloutCarrier>, HookError> {
    let settings = decode::<EchoSettings>(settings)?.unwrap_or_default();
    Ok(Box::new(EchoCarrier { settings }))
}

fn proto_settings() -> HookSettings {
    prototype::<EchoSettings>()
}

export_hook! {
    program: PROGRAM_AGENT,
    load: load,
    proto_settings: proto_settings,
    cli_flags: proto_settings,
}
