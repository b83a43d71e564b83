//! In-memory process and provider for monitor tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{GameProcess, ProcessCandidate, ProcessProvider};
use crate::error::{Error, Result};

/// A fake process whose memory is a byte map. Clones share state, so a test
/// can keep a handle while the monitor owns another.
#[derive(Clone, Default)]
pub struct MockProcess {
    memory: Rc<RefCell<HashMap<u64, u8>>>,
    exited: Rc<Cell<bool>>,
    fail_reads: Rc<Cell<bool>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MockProcess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_byte(&self, address: u64, value: u8) {
        self.memory.borrow_mut().insert(address, value);
    }

    pub fn byte(&self, address: u64) -> Option<u8> {
        self.memory.borrow().get(&address).copied()
    }

    pub fn exit(&self) {
        self.exited.set(true);
    }

    pub fn fail_reads(&self) {
        self.fail_reads.set(true);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.set(true);
    }
}

impl GameProcess for MockProcess {
    fn read_byte(&self, address: u64) -> Result<u8> {
        if self.fail_reads.get() || self.exited.get() {
            return Err(Error::MemoryReadFailed {
                address,
                message: "mock read failure".to_string(),
            });
        }
        self.memory
            .borrow()
            .get(&address)
            .copied()
            .ok_or(Error::MemoryReadFailed {
                address,
                message: "unmapped address".to_string(),
            })
    }

    fn write_byte(&self, address: u64, value: u8) -> Result<()> {
        if self.fail_writes.get() || self.exited.get() {
            return Err(Error::MemoryWriteFailed {
                address,
                message: "mock write failure".to_string(),
            });
        }
        self.memory.borrow_mut().insert(address, value);
        Ok(())
    }

    fn has_exited(&self) -> bool {
        self.exited.get()
    }
}

/// A process entry the provider will report as running.
pub struct MockEntry {
    pub process: MockProcess,
    pub base_address: u64,
    pub file_version: String,
}

/// [`ProcessProvider`] over a fixed set of fake processes. Clones share the
/// process list, so a test can add or remove entries while the monitor holds
/// its own copy.
#[derive(Clone, Default)]
pub struct MockProvider {
    running: Rc<RefCell<HashMap<String, MockEntry>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a running process under `process_name`.
    pub fn insert(&self, process_name: &str, base_address: u64, file_version: &str) -> MockProcess {
        let process = MockProcess::new();
        self.running.borrow_mut().insert(
            process_name.to_string(),
            MockEntry {
                process: process.clone(),
                base_address,
                file_version: file_version.to_string(),
            },
        );
        process
    }

    pub fn remove(&self, process_name: &str) {
        self.running.borrow_mut().remove(process_name);
    }
}

impl ProcessProvider for MockProvider {
    type Process = MockProcess;

    fn find_and_open(&self, process_name: &str) -> Result<Option<ProcessCandidate<MockProcess>>> {
        Ok(self
            .running
            .borrow()
            .get(process_name)
            .map(|entry| ProcessCandidate {
                process: entry.process.clone(),
                pid: 4242,
                base_address: entry.base_address,
                file_version: entry.file_version.clone(),
            }))
    }
}
