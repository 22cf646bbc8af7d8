use dotenvy::dotenv;
use lazy_static::lazy_static;
use secrecy::Secret;
use std::env as std_env;

lazy_static! {
    pub static ref API_BASE_URL: String =
        load_or_default(env::API_BASE_URL_ENV_VAR, DEFAULT_API_BASE_URL);
    pub static ref API_TOKEN: Option<Secret<String>> = load_api_token();
    pub static ref PAGE_SIZE: usize = load_page_size();
}

fn load_env() {
    dotenv().ok();
}

fn load_or_default(variable_name: &str, default_value: &str) -> String {
    load_env();

    match std_env::var(variable_name) {
        Ok(value) => {
            if value.is_empty() {
                String::from(default_value)
            } else {
                value
            }
        }
        Err(_) => String::from(default_value),
    }
}

fn load_api_token() -> Option<Secret<String>> {
    load_env();
    std_env::var(env::API_TOKEN_ENV_VAR)
        .ok()
        .filter(|token| !token.is_empty())
        .map(Secret::new)
}

fn load_page_size() -> usize {
    let raw = load_or_default(env::PAGE_SIZE_ENV_VAR, "");
    match raw.parse::<usize>() {
        Ok(size) if size > 0 => size,
        _ => DEFAULT_PAGE_SIZE,
    }
}

pub mod env {
    pub const API_BASE_URL_ENV_VAR: &str = "PROJECT_BOARD_API_BASE_URL";
    pub const API_TOKEN_ENV_VAR: &str = "PROJECT_BOARD_API_TOKEN";
    pub const PAGE_SIZE_ENV_VAR: &str = "PROJECT_BOARD_PAGE_SIZE";
}

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub mod prod {
    pub mod http_client {
        use std::time::Duration;

        pub const TIMEOUT: Duration = std::time::Duration::from_secs(10);
    }
}

pub mod test {
    pub mod http_client {
        use std::time::Duration;

        pub const TIMEOUT: Duration = std::time::Duration::from_millis(200);
    }
}
