mod rate_limiter_tests;
