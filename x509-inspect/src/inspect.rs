use std::fmt;
use std::{fs, path::Path};

use anyhow::Context;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use x509_tree::{Certificate, ExtensionValue, GeneralName};

const PEM_ARMOR: &[u8] = b"-----BEGIN";

/// Decodes a PEM or DER certificate, telling them apart by the PEM armor
pub fn decode_certificate(bytes: &[u8]) -> anyhow::Result<Certificate> {
	let cert = if bytes.trim_ascii_start().starts_with(PEM_ARMOR) {
		let pem_str = std::str::from_utf8(bytes).context("PEM file is not UTF-8")?;
		Certificate::from_pem(pem_str)?
	} else {
		Certificate::from_der(bytes)?
	};
	Ok(cert)
}

/// Reads and decodes the certificate at `path`
pub fn load_certificate(path: &Path) -> anyhow::Result<Certificate> {
	let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
	let cert =
		decode_certificate(&bytes).with_context(|| format!("decoding {}", path.display()))?;
	log::debug!("decoded {} ({} bytes)", path.display(), bytes.len());
	Ok(cert)
}

/// Outcome of checking a certificate's signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
	/// The signature matches the issuer key
	Valid,
	/// The signature does not match
	Invalid,
}

impl fmt::Display for Verdict {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Verdict::Valid => f.write_str("valid"),
			Verdict::Invalid => f.write_str("invalid"),
		}
	}
}

/// Checks `cert` against the key of `issuer`, or against its own key without one
pub fn verify(cert: &Certificate, issuer: Option<&Certificate>) -> anyhow::Result<Verdict> {
	let signer = issuer.unwrap_or(cert);
	let key = signer.tbs_certificate().subject_public_key_info();
	let valid = cert
		.check_signature(key)
		.context("checking the signature")?;
	Ok(if valid {
		Verdict::Valid
	} else {
		Verdict::Invalid
	})
}

fn timestamp(seconds: i64) -> String {
	OffsetDateTime::from_unix_timestamp(seconds)
		.ok()
		.and_then(|dt| dt.format(&Rfc3339).ok())
		.unwrap_or_else(|| seconds.to_string())
}

fn general_name(name: &GeneralName) -> String {
	match name {
		GeneralName::Rfc822Name(name) => format!("email:{name}"),
		GeneralName::DnsName(name) => format!("DNS:{name}"),
		GeneralName::Uri(name) => format!("URI:{name}"),
		GeneralName::IpAddress(addr) => format!("IP:{addr}"),
		GeneralName::Other(der) => format!("other:{} bytes", der.len()),
		_ => "unknown".to_string(),
	}
}

/// Displays the fields of a certificate as `name: value` lines
pub struct Description<'a>(pub &'a Certificate);

impl fmt::Display for Description<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let cert = self.0;
		let tbs = cert.tbs_certificate();
		writeln!(f, "serial: {}", tbs.serial_number())?;
		match cert.signature_algorithm_name() {
			Ok(alg) => writeln!(f, "signature algorithm: {alg}")?,
			Err(_) => writeln!(
				f,
				"signature algorithm: {}",
				cert.signature_algorithm().algorithm()
			)?,
		}
		writeln!(f, "issuer: {}", tbs.issuer())?;
		writeln!(f, "subject: {}", tbs.subject())?;
		writeln!(
			f,
			"validity: {} to {}",
			timestamp(tbs.validity().not_before()),
			timestamp(tbs.validity().not_after())
		)?;
		if let Some(cn) = cert.common_name() {
			writeln!(f, "common name: {cn}")?;
		}
		if let Some(ou) = cert.organizational_unit_name() {
			writeln!(f, "organizational unit: {ou}")?;
		}
		if let Ok(san) = cert.subject_alternative_names() {
			let names = match san.extn_value() {
				ExtensionValue::SubjectAlternativeName(names) => {
					names.iter().map(general_name).collect::<Vec<_>>().join(", ")
				},
				_ => "(not decoded)".to_string(),
			};
			writeln!(f, "subject alternative names: {names}")?;
		}
		if let Ok(bc) = cert.basic_constraints() {
			let critical = if bc.critical() { ", critical" } else { "" };
			let value = match bc.extn_value().as_basic_constraints() {
				Some(bc) => match bc.path_len_constraint() {
					Some(len) if bc.ca() => format!("CA, path length {len}"),
					_ if bc.ca() => "CA".to_string(),
					_ => "end entity".to_string(),
				},
				None => "(not decoded)".to_string(),
			};
			writeln!(f, "basic constraints: {value}{critical}")?;
		}
		Ok(())
	}
}

/// Renders the fields of `cert` as `name: value` lines
pub fn describe(cert: &Certificate) -> String {
	Description(cert).to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	// P-256 root CA for C=BR, O=Crab widgits SE, CN=Crab Root CA
	const CA_PEM: &str = include_str!("../../x509-tree/tests/data/ca_ec.pem");
	// P-256 leaf for crabs.crabs, issued by CA_PEM
	const LEAF_PEM: &str = include_str!("../../x509-tree/tests/data/leaf_ec.pem");

	#[test]
	fn decodes_pem_and_der() {
		let from_pem = decode_certificate(CA_PEM.as_bytes()).unwrap();
		let der = pem::parse(CA_PEM).unwrap().into_contents();
		let from_der = decode_certificate(&der).unwrap();
		assert_eq!(from_pem, from_der);
		assert!(decode_certificate(b"garbage").is_err());
	}

	#[test]
	fn verifies_against_issuer_or_self() {
		let ca = decode_certificate(CA_PEM.as_bytes()).unwrap();
		let leaf = decode_certificate(LEAF_PEM.as_bytes()).unwrap();
		assert_eq!(verify(&ca, None).unwrap(), Verdict::Valid);
		assert_eq!(verify(&leaf, Some(&ca)).unwrap(), Verdict::Valid);
		assert_eq!(verify(&leaf, None).unwrap(), Verdict::Invalid);
		assert_eq!(Verdict::Invalid.to_string(), "invalid");
	}

	#[test]
	fn describes_leaf() {
		let leaf = decode_certificate(LEAF_PEM.as_bytes()).unwrap();
		let text = describe(&leaf);
		assert!(text.contains("signature algorithm: SHA-256 with ECDSA\n"));
		assert!(text.contains("common name: crabs.crabs\n"));
		assert!(text.contains("organizational unit: Crustacean Ops\n"));
		assert!(text.contains(
			"subject alternative names: DNS:crabs.crabs, DNS:localhost, IP:127.0.0.1, URI:https://crabs.crabs/\n"
		));
		assert!(text.contains("basic constraints: end entity, critical\n"));
		assert!(text.contains("validity: 2024-01-10T00:00:00Z to 2034-01-10T00:00:00Z\n"));
	}

	#[test]
	fn describes_ca() {
		let ca = decode_certificate(CA_PEM.as_bytes()).unwrap();
		let text = format!("{}", Description(&ca));
		assert_eq!(text, describe(&ca));
		assert!(text.starts_with("serial: 1f:2e:3d:4c:5b:6a\n"));
		assert!(text.contains("basic constraints: CA, path length 1, critical\n"));
		assert!(!text.contains("subject alternative names"));
		assert!(!text.contains("organizational unit"));
	}
}
