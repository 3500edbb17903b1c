use std::time::Duration;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn api_url(&self) -> String;
    fn user_identifier(&self) -> String;
    fn payment_window(&self) -> Duration;
}
