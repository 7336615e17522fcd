//! Domain model (objects, retention policy, per-object state, errors).
//!
//! ここには副作用を持たない型だけを置きます。
//! ストアや時計へのアクセスは ports 経由で行います。

pub mod errors;
pub mod object;
pub mod policy;
pub mod state;

pub use self::errors::{ErrorKind, PolicyError, StoreError};
pub use self::object::{ObjectKey, StoredObject};
pub use self::policy::RetentionPolicy;
pub use self::state::{DeleteOutcome, ObjectState};
