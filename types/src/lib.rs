pub mod random;

pub use random::{
    transaction_namespace, Account, Beacon, Event, Identity, Instruction, Key, Output,
    RecoveryQueue, Transaction, Value, MAX_ERROR_MESSAGE_LENGTH, NAMESPACE, TRANSACTION_SUFFIX,
};
