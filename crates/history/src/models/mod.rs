mod snapshot;

pub(crate) use self::snapshot::{NewSnapshotRow, SnapshotRow, from_nanos, to_nanos};
