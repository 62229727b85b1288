//! In-memory `Handle`/`Statement` doubles that record every call, for tests
//! that assert on call order rather than on database contents.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sql_handle::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Prepare(String),
    Exec(Vec<RowValues>),
    HandleExec(String, Vec<RowValues>),
    Close,
    Commit,
    Rollback,
}

/// Shared call log plus failure injection.
#[derive(Debug, Default)]
pub struct Script {
    pub calls: RefCell<Vec<Call>>,
    /// Zero-based index among `Exec` calls that should fail.
    pub fail_exec_at: Cell<Option<usize>>,
    pub fail_close: Cell<bool>,
    pub fail_commit: Cell<bool>,
    exec_count: Cell<usize>,
}

impl Script {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn execs(&self) -> Vec<Vec<RowValues>> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Exec(args) => Some(args.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

pub struct RecordingStatement {
    script: Rc<Script>,
    closed: bool,
}

impl RecordingStatement {
    pub fn new(script: Rc<Script>) -> Self {
        Self {
            script,
            closed: false,
        }
    }
}

impl Statement for RecordingStatement {
    fn exec(&mut self, args: &[RowValues]) -> Result<ExecResult, SqlHandleError> {
        if self.closed {
            return Err(SqlHandleError::StatementClosed);
        }
        self.script.push(Call::Exec(args.to_vec()));
        let n = self.script.exec_count.get();
        self.script.exec_count.set(n + 1);
        if self.script.fail_exec_at.get() == Some(n) {
            return Err(SqlHandleError::StatementExec(DriverError::other(format!(
                "exec #{n} rejected"
            ))));
        }
        Ok(ExecResult {
            rows_affected: usize::from(!args.is_empty()),
            last_insert_id: None,
        })
    }

    fn query_row(&mut self, _args: &[RowValues]) -> Row {
        Row::from_result(Ok(ResultSet::new(vec!["id".into()])))
    }

    fn query(&mut self, _args: &[RowValues]) -> ResultSetRows {
        ResultSetRows::from_result(Ok(ResultSet::new(vec!["id".into()])))
    }

    fn close(&mut self) -> Result<(), SqlHandleError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.script.push(Call::Close);
        if self.script.fail_close.get() {
            return Err(SqlHandleError::StatementClose(DriverError::other(
                "finalize failed",
            )));
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// A transaction double with the same state rules as a real backend.
pub struct RecordingTx {
    script: Rc<Script>,
    state: TxState,
}

impl RecordingTx {
    pub fn new(script: Rc<Script>) -> Self {
        Self {
            script,
            state: TxState::Open,
        }
    }

    fn ensure_open(&self) -> Result<(), SqlHandleError> {
        match self.state {
            TxState::Open => Ok(()),
            done => Err(SqlHandleError::TransactionDone(done)),
        }
    }
}

impl Handle for RecordingTx {
    type Statement<'a> = RecordingStatement;

    fn exec(&self, query: &str, args: &[RowValues]) -> Result<ExecResult, SqlHandleError> {
        self.ensure_open()?;
        self.script
            .push(Call::HandleExec(query.to_string(), args.to_vec()));
        Ok(ExecResult::default())
    }

    fn prepare(&self, query: &str) -> Result<Self::Statement<'_>, SqlHandleError> {
        self.ensure_open()?;
        self.script.push(Call::Prepare(query.to_string()));
        Ok(RecordingStatement::new(Rc::clone(&self.script)))
    }

    fn query_row(&self, _query: &str, _args: &[RowValues]) -> Row {
        match self.ensure_open() {
            Ok(()) => Row::from_result(Ok(ResultSet::new(vec!["id".into()]))),
            Err(err) => Row::from_error(err),
        }
    }

    fn query(&self, _query: &str, _args: &[RowValues]) -> ResultSetRows {
        ResultSetRows::from_result(
            self.ensure_open()
                .map(|()| ResultSet::new(vec!["id".into()])),
        )
    }
}

impl TransactionHandle for RecordingTx {
    fn commit(&mut self) -> Result<(), SqlHandleError> {
        self.ensure_open()?;
        self.script.push(Call::Commit);
        if self.script.fail_commit.get() {
            self.state = TxState::RolledBack;
            return Err(SqlHandleError::TransactionCommit(DriverError::other(
                "commit rejected",
            )));
        }
        self.state = TxState::Committed;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SqlHandleError> {
        self.ensure_open()?;
        self.script.push(Call::Rollback);
        self.state = TxState::RolledBack;
        Ok(())
    }

    fn state(&self) -> TxState {
        self.state
    }
}

pub fn row(values: Vec<RowValues>) -> BatchRow {
    BatchRow(values)
}
