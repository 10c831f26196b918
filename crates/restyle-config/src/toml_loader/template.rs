/// The default config file content, with every option commented out.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# restyle configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[sync]
# startup_delay_ms = 500   # 0-10000, wait before listening for changes
# insert_retry_ms = 100    # 10-5000, wait before retrying style insertion
# reapply_delay_ms = 100   # 10-5000, wait before restoring a removed style

[store]
# path = "/path/to/store.json"   # defaults to store.json next to this file
# watch_debounce_ms = 500         # wait after an external edit before reloading

[logging]
# level = "INFO"           # TRACE, DEBUG, INFO, WARNING, ERROR

[window]
# width = 1280             # 320-7680
# height = 800             # 240-4320
# title = "restyle"
"##
}
