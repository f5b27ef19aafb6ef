mod http_log_tests;
