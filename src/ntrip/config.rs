use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::time::Duration;

/// Registered NTRIP port.
pub const DEFAULT_PORT: u16 = 2101;
const DEFAULT_IDLE_DELAY: Duration = Duration::from_millis(10);
const DEFAULT_READ_BUFFER_SIZE: usize = 4096;
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Username and password sent as HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value of the `Authorization` header.
    pub fn basic_auth(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

// Keeps the password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Connection settings for an NTRIP caster.
#[derive(Debug, Clone)]
pub struct NtripConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Option<Credentials>,
    pub user_agent: String,
    /// Pause after a read that found no data.
    pub idle_delay: Duration,
    pub read_buffer_size: usize,
    /// Chunks buffered per subscriber before the slowest one starts lagging.
    pub channel_capacity: usize,
}

impl NtripConfig {
    pub fn new<H: Into<String>>(host: H, port: u16) -> Self {
        NtripConfig {
            host: host.into(),
            port,
            credentials: None,
            user_agent: format!("NTRIP {}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            idle_delay: DEFAULT_IDLE_DELAY,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_credentials<U: Into<String>, P: Into<String>>(mut self, username: U, password: P) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_idle_delay(mut self, idle_delay: Duration) -> Self {
        self.idle_delay = idle_delay;
        self
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// `host:port` for `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The GET request for `mountpoint`; an empty mountpoint requests the
    /// source table.
    pub fn request(&self, mountpoint: &str) -> String {
        let mut request = format!(
            "GET /{} HTTP/1.1\r\nHost: {}\r\nUser-Agent: {}\r\n",
            mountpoint.trim_start_matches('/'),
            self.host,
            self.user_agent
        );
        if let Some(credentials) = &self.credentials {
            request.push_str(&format!("Authorization: {}\r\n", credentials.basic_auth()));
        }
        request.push_str("Accept: */*\r\nConnection: close\r\n\r\n");
        request
    }
}

impl Default for NtripConfig {
    fn default() -> Self {
        NtripConfig::new("localhost", DEFAULT_PORT)
    }
}
