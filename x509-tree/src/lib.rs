/*!
Typed X.509 certificate trees

This crate decodes X.509 certificates ([RFC 5280](https://www.rfc-editor.org/rfc/rfc5280))
into an immutable tree of values that mirrors their ASN.1 structure, and
encodes such trees back to DER byte for byte.

On top of the tree it offers two operations: checking that a certificate
was signed by a given issuer key with [`Certificate::check_signature`], and
turning the tree into a [`CertificateDer`] handle for the rest of the
rustls ecosystem with [`Certificate::to_x509_certificate`].

Object identifiers outside the small set this crate knows about are kept
as they are; see the [`oid`] module.
*/
#![cfg_attr(
	all(feature = "pem", feature = "x509-parser"),
	doc = r##"
## Example

```
use x509_tree::{Certificate, Error};

fn inspect(pem: &str) -> Result<bool, Error> {
	let cert = Certificate::from_pem(pem)?;
	println!("{}", cert.tbs_certificate().subject());
	let _handle = cert.to_x509_certificate()?;
	// self-signed check
	cert.check_signature(cert.tbs_certificate().subject_public_key_info())
}
# let _ = inspect;
```"##
)]
#![forbid(unsafe_code)]
#![forbid(non_ascii_idents)]
#![deny(missing_docs)]
#![allow(clippy::complexity, clippy::style, clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub use pki_types::CertificateDer;
pub use yasna::models::ObjectIdentifier;

pub use crate::algorithm::{AlgorithmIdentifier, AlgorithmParameters, SignatureAlgorithm};
pub use crate::certificate::{Certificate, SerialNumber, TbsCertificate, Validity, Version};
pub use crate::error::Error;
pub use crate::ext::{BasicConstraints, Extension, ExtensionValue, GeneralName};
pub use crate::key::{BitString, PrivateKeyInfo, SubjectPublicKeyInfo};
pub use crate::name::{AttributeTypeAndValue, AttributeValue, Name, RelativeDistinguishedName};
#[cfg(feature = "x509-parser")]
pub use crate::platform::X509ParserService;
pub use crate::platform::CertificateService;
pub use crate::verify::{RingVerifier, SignatureVerifier};

mod algorithm;
mod certificate;
mod der;
mod error;
mod ext;
mod key;
mod name;
pub mod oid;
mod platform;
mod ring_like;
mod verify;

#[cfg(feature = "pem")]
const ENCODE_CONFIG: pem::EncodeConfig = {
	let line_ending = match cfg!(target_family = "windows") {
		true => pem::LineEnding::CRLF,
		false => pem::LineEnding::LF,
	};
	pem::EncodeConfig::new().set_line_ending(line_ending)
};
