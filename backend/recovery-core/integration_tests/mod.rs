mod portal_tests;
