mod google_speech_service_test;
