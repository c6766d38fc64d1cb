use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;

pub const USER_AGENT: &str = "gator";

const MAX_REDIRECTS: usize = 10;

pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .timeout(timeout)
        .build()
}
