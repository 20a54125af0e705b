pub mod canned_http;
pub mod price_list;
#[cfg(feature = "test_utils")]
pub mod prepare_env;
