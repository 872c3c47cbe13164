/// Intercept messages using the `log` crate and print them to STDERR. Defaults to `info`, but
/// `RUST_LOG` overrides that, like `RUST_LOG=synthdemand=debug` to watch every sampling round.
///
/// Calling this twice (from tests, for example) is harmless; only the first call installs a
/// logger.
pub fn setup() {
    use env_logger::{Builder, Env};
    let _ = Builder::from_env(Env::default().default_filter_or("info")).try_init();
}
