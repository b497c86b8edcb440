//! Document store adapter.
//!
//! The backend is an external document database offering per-document CRUD,
//! atomic batches, optimistic transactions and simple range/equality queries.
//! Services only ever talk to it through [`DocumentStore`].

mod document;
mod memory;
mod store;
mod transaction;

pub use document::{lookup_path, string_at};
pub use memory::MemoryStore;
pub use store::{
  CONFIG, DbError, Document, DocumentStore, FieldTransform, Result, SetMode, Transaction, USERNAMES, USERS, WriteOp,
};
pub use transaction::{TransactionBody, run_transaction};
