mod mail_service_tests;
