#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use bigtable_config::Config;
use bigtable_data::{
    client::{ChunkStream, DataClient},
    read::ReadRowsRequest,
    row_data::ReadRowsChunk,
    table::Table,
    wire::{
        CheckAndMutateRowRequest, CheckAndMutateRowResponse, MutateRowRequest,
        ReadModifyWriteRowRequest, WireRow,
    },
};
use envconfig::Envconfig;
use futures::StreamExt;

pub type ScriptedRead = Vec<anyhow::Result<ReadRowsChunk>>;

/// In-memory transport that records every request and replays scripted
/// responses.
#[derive(Debug, Default)]
pub struct FakeClient {
    pub reads: Mutex<VecDeque<ScriptedRead>>,
    pub read_requests: Mutex<Vec<ReadRowsRequest>>,
    pub mutate_requests: Mutex<Vec<MutateRowRequest>>,
    pub check_requests: Mutex<Vec<CheckAndMutateRowRequest>>,
    pub rmw_requests: Mutex<Vec<ReadModifyWriteRowRequest>>,
    pub predicate_matched: bool,
    pub rmw_row: WireRow,
    pub fail_mutations: bool,
}

impl FakeClient {
    pub fn with_reads(reads: Vec<ScriptedRead>) -> Self {
        Self {
            reads: Mutex::new(reads.into()),
            ..Default::default()
        }
    }

    pub fn read_requests(&self) -> Vec<ReadRowsRequest> {
        self.read_requests.lock().unwrap().clone()
    }

    pub fn mutate_requests(&self) -> Vec<MutateRowRequest> {
        self.mutate_requests.lock().unwrap().clone()
    }

    pub fn check_requests(&self) -> Vec<CheckAndMutateRowRequest> {
        self.check_requests.lock().unwrap().clone()
    }

    pub fn rmw_requests(&self) -> Vec<ReadModifyWriteRowRequest> {
        self.rmw_requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DataClient for FakeClient {
    async fn read_rows(
        &self,
        request: ReadRowsRequest,
        _timeout: Duration,
    ) -> anyhow::Result<ChunkStream> {
        self.read_requests.lock().unwrap().push(request);
        let chunks = self.reads.lock().unwrap().pop_front().unwrap_or_default();
        Ok(futures::stream::iter(chunks).boxed())
    }

    async fn mutate_row(
        &self,
        request: MutateRowRequest,
        _timeout: Duration,
    ) -> anyhow::Result<()> {
        if self.fail_mutations {
            anyhow::bail!("unavailable");
        }
        self.mutate_requests.lock().unwrap().push(request);
        Ok(())
    }

    async fn check_and_mutate_row(
        &self,
        request: CheckAndMutateRowRequest,
        _timeout: Duration,
    ) -> anyhow::Result<CheckAndMutateRowResponse> {
        self.check_requests.lock().unwrap().push(request);
        Ok(CheckAndMutateRowResponse {
            predicate_matched: self.predicate_matched,
        })
    }

    async fn read_modify_write_row(
        &self,
        request: ReadModifyWriteRowRequest,
        _timeout: Duration,
    ) -> anyhow::Result<WireRow> {
        self.rmw_requests.lock().unwrap().push(request);
        Ok(self.rmw_row.clone())
    }
}

pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut env = HashMap::new();
    env.insert("BIGTABLE_PROJECT_ID".to_string(), "project".to_string());
    env.insert("BIGTABLE_ZONE".to_string(), "zone".to_string());
    env.insert("BIGTABLE_CLUSTER".to_string(), "cluster".to_string());
    for (key, value) in overrides {
        env.insert(key.to_string(), value.to_string());
    }
    Config::init_from_hashmap(&env).expect("test config")
}

pub fn table_with(client: Arc<FakeClient>, overrides: &[(&str, &str)]) -> Table {
    Table::new(client, &test_config(overrides), "events")
}

pub const TABLE_NAME: &str = "projects/project/zones/zone/clusters/cluster/tables/events";
