mod aggregate_windows;
mod health_report;

#[path = "../common/mod.rs"]
pub mod common;

#[cfg(test)]
mod tests {
    use test_log::test;

    #[test]
    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("trace")
            .try_init();
    }
}
