// ponctl-api: management protocol clients for optical line terminals
//
// The vendor HTTP gateway client and the SNMP session surface. This is the
// only crate that touches the network; `ponctl-core` drives it through its
// transport backends.

pub mod error;
pub mod http;
pub mod snmp;
pub mod transport;

pub use error::Error;
pub use http::{BasicAuth, MibObject, VendorClient};
pub use snmp::{
    MibTable, Oid, PartialWalk, SnmpCredentials, SnmpErrorStatus, SnmpSession, SnmpTarget,
    SnmpValue, SnmpVersion, VarBind,
};
pub use transport::{TlsMode, TransportConfig};
