//! Server configuration, parsed from command-line arguments.

/// Listening address for the server. Defaults to the standard Redis port
/// on loopback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "127.0.0.1".to_string(),
            port: 6379,
        }
    }
}

impl ServerConfig {
    /// Walks `--port <n>` and `--bind <addr>` flags; unknown flags and
    /// unparseable values are ignored in favor of the defaults.
    pub fn from_args(args: impl Iterator<Item = String>) -> Self {
        let mut config = ServerConfig::default();
        let args: Vec<String> = args.collect();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--port" => {
                    if i + 1 < args.len() {
                        if let Ok(port) = args[i + 1].parse() {
                            config.port = port;
                        }
                        i += 1;
                    }
                }
                "--bind" => {
                    if i + 1 < args.len() {
                        config.bind = args[i + 1].clone();
                        i += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }

        config
    }
}
