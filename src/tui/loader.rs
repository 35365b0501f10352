//! Snapshot acquisition off the UI thread.
//!
//! A load reads and parses one snapshot on a worker thread and sends exactly
//! one message back. Dropping a `PendingLoad` abandons it; the worker's send
//! then fails quietly.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Result, anyhow};

use crate::graph::demo::demo_graph;
use crate::graph::model::Graph;
use crate::parser::snapshot;

/// Where snapshots come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Demo,
    File(PathBuf),
}

impl Source {
    /// Read and parse the snapshot on the calling thread.
    pub fn load(&self) -> Result<Graph> {
        match self {
            Self::Demo => Ok(demo_graph()),
            Self::File(path) => snapshot::load(path),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Demo => "built-in demo".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// A load running on a worker thread.
#[derive(Debug)]
pub struct PendingLoad {
    rx: Receiver<Result<Graph>>,
}

impl PendingLoad {
    pub fn spawn(source: Source) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = source.load();
            let _ = tx.send(result);
        });
        Self { rx }
    }

    /// `None` while the worker is still busy.
    pub fn poll(&self) -> Option<Result<Graph>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(anyhow!("snapshot loader stopped without a result")))
            }
        }
    }
}
