mod hooks_test;
