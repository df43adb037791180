#![warn(missing_docs)]
//! This library wraps [x509_tree] to inspect X.509 certificates: decode
//! them from PEM or DER, render their fields and check their signature
//! against an issuer.

mod inspect;
pub use inspect::{decode_certificate, describe, load_certificate, verify, Description, Verdict};
