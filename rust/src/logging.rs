use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "grouplink_core=info";

/// Safe to call once per sheet; only the first call installs a subscriber.
pub fn init_logging(filter_override: Option<&str>) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| filter_override.map(ToString::to_string))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());
    let env_filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);

    #[cfg(target_os = "android")]
    let registry = registry.with(paranoid_android::layer(env!("CARGO_PKG_NAME")));

    #[cfg(target_os = "ios")]
    let registry = registry.with(tracing_oslog::OsLogger::new(
        "com.grouplink.core",
        "default",
    ));

    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    let registry = registry.with(tracing_subscriber::fmt::layer().with_target(true));

    // A host that already installed a subscriber keeps it.
    let _ = registry.try_init();
}
