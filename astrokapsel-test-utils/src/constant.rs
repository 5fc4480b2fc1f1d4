//! Placeholder values used when pointing the server at the mock generation service.

/// API key sent to the mock generation service. Not a real credential.
pub static TEST_GENERATION_API_KEY: &str = "test_generation_api_key";

/// Text model identifier used by test generation clients.
pub static TEST_TEXT_MODEL: &str = "test-text-model";

/// Image model identifier used by test generation clients.
pub static TEST_IMAGE_MODEL: &str = "test-image-model";

/// Public base URL used when building image URLs in tests.
pub static TEST_PUBLIC_BASE_URL: &str = "http://localhost:8080";
