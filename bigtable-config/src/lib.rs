use envconfig::Envconfig;
use lazy_static::lazy_static;

#[derive(Debug, Clone, Envconfig)]
pub struct Config {
    #[envconfig(from = "BIGTABLE_PROJECT_ID", default = "")]
    pub project_id: String,
    #[envconfig(from = "BIGTABLE_ZONE", default = "us-central1-c")]
    pub zone: String,
    #[envconfig(from = "BIGTABLE_CLUSTER", default = "")]
    pub cluster: String,
    /// Default deadline for a single data RPC.
    #[envconfig(from = "BIGTABLE_TIMEOUT_SECONDS", default = "10")]
    pub timeout_seconds: u64,
    /// Upper bound on mutations per commit (per predicate state for conditional rows).
    #[envconfig(from = "BIGTABLE_MAX_MUTATIONS", default = "100000")]
    pub max_mutations: usize,
    /// Level for the host application's tracing subscriber; the library itself
    /// only emits events.
    #[envconfig(from = "BIGTABLE_LOG_LEVEL", default = "info")]
    pub log_level: String,
}

impl Config {
    pub fn init() -> Config {
        Config::init_from_env().expect("Failed to load config")
    }

    pub fn project_name(&self) -> String {
        format!("projects/{}", self.project_id)
    }

    /// Fully qualified cluster name, e.g. `projects/p/zones/z/clusters/c`.
    pub fn cluster_name(&self) -> String {
        format!(
            "{}/zones/{}/clusters/{}",
            self.project_name(),
            self.zone,
            self.cluster
        )
    }

    pub fn table_name(&self, table_id: &str) -> String {
        format!("{}/tables/{}", self.cluster_name(), table_id)
    }
}

// Process-wide config for host applications; library code takes `&Config`.
lazy_static! {
    pub static ref CONFIG: Config = Config::init();
}
