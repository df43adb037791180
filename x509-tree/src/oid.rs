//! Object identifiers this crate knows by name.
//!
//! Identifiers that are not listed here are carried through the certificate
//! tree untouched; looking them up simply yields `None`.

use yasna::models::ObjectIdentifier;

/// id-at-countryName in [RFC 5280](https://www.rfc-editor.org/rfc/rfc5280#appendix-A)
pub const COUNTRY_NAME: &[u64] = &[2, 5, 4, 6];
/// id-at-localityName in [RFC 5280](https://www.rfc-editor.org/rfc/rfc5280#appendix-A)
pub const LOCALITY_NAME: &[u64] = &[2, 5, 4, 7];
/// id-at-stateOrProvinceName in [RFC 5280](https://www.rfc-editor.org/rfc/rfc5280#appendix-A)
pub const STATE_OR_PROVINCE_NAME: &[u64] = &[2, 5, 4, 8];
/// id-at-organizationName in [RFC 5280](https://www.rfc-editor.org/rfc/rfc5280#appendix-A)
pub const ORG_NAME: &[u64] = &[2, 5, 4, 10];
/// id-at-organizationalUnitName in [RFC 5280](https://www.rfc-editor.org/rfc/rfc5280#appendix-A)
pub const ORG_UNIT_NAME: &[u64] = &[2, 5, 4, 11];
/// id-at-commonName in [RFC 5280](https://www.rfc-editor.org/rfc/rfc5280#appendix-A)
pub const COMMON_NAME: &[u64] = &[2, 5, 4, 3];

/// id-ecPublicKey in [RFC 5480](https://datatracker.ietf.org/doc/html/rfc5480#appendix-A)
pub const EC_PUBLIC_KEY: &[u64] = &[1, 2, 840, 10045, 2, 1];
/// secp256r1 in [RFC 5480](https://datatracker.ietf.org/doc/html/rfc5480#appendix-A)
pub const EC_SECP_256_R1: &[u64] = &[1, 2, 840, 10045, 3, 1, 7];
/// secp384r1 in [RFC 5480](https://datatracker.ietf.org/doc/html/rfc5480#appendix-A)
pub const EC_SECP_384_R1: &[u64] = &[1, 3, 132, 0, 34];

/// rsaEncryption in [RFC 4055](https://www.rfc-editor.org/rfc/rfc4055#section-6)
pub const RSA_ENCRYPTION: &[u64] = &[1, 2, 840, 113549, 1, 1, 1];
/// id-Ed25519 in [RFC 8410](https://www.rfc-editor.org/rfc/rfc8410#section-3)
pub const ED25519: &[u64] = &[1, 3, 101, 112];

/// sha256WithRSAEncryption in [RFC 4055](https://www.rfc-editor.org/rfc/rfc4055#section-5)
pub const SHA256_WITH_RSA_ENCRYPTION: &[u64] = &[1, 2, 840, 113549, 1, 1, 11];
/// ecdsa-with-SHA256 in [RFC 5758](https://www.rfc-editor.org/rfc/rfc5758#section-3.2)
pub const ECDSA_WITH_SHA256: &[u64] = &[1, 2, 840, 10045, 4, 3, 2];
/// ecdsa-with-SHA384 in [RFC 5758](https://www.rfc-editor.org/rfc/rfc5758#section-3.2)
pub const ECDSA_WITH_SHA384: &[u64] = &[1, 2, 840, 10045, 4, 3, 3];

/// id-ce-subjectKeyIdentifier in [RFC 5280](https://www.rfc-editor.org/rfc/rfc5280#appendix-A)
pub const SUBJECT_KEY_IDENTIFIER: &[u64] = &[2, 5, 29, 14];
/// id-ce-keyUsage in [RFC 5280](https://tools.ietf.org/html/rfc5280#appendix-A.2)
pub const KEY_USAGE: &[u64] = &[2, 5, 29, 15];
/// id-ce-subjectAltName in [RFC 5280](https://tools.ietf.org/html/rfc5280#appendix-A.2)
pub const SUBJECT_ALT_NAME: &[u64] = &[2, 5, 29, 17];
/// id-ce-basicConstraints in [RFC 5280](https://tools.ietf.org/html/rfc5280#appendix-A.2)
pub const BASIC_CONSTRAINTS: &[u64] = &[2, 5, 29, 19];
/// id-ce-authorityKeyIdentifier in [RFC 5280](https://www.rfc-editor.org/rfc/rfc5280#appendix-A)
pub const AUTHORITY_KEY_IDENTIFIER: &[u64] = &[2, 5, 29, 35];
/// id-ce-extKeyUsage in [RFC 5280](https://www.rfc-editor.org/rfc/rfc5280#appendix-A)
pub const EXT_KEY_USAGE: &[u64] = &[2, 5, 29, 37];

static REGISTRY: &[(&str, &[u64])] = &[
	("countryName", COUNTRY_NAME),
	("localityName", LOCALITY_NAME),
	("stateOrProvinceName", STATE_OR_PROVINCE_NAME),
	("organizationName", ORG_NAME),
	("organizationalUnitName", ORG_UNIT_NAME),
	("commonName", COMMON_NAME),
	("ecPublicKey", EC_PUBLIC_KEY),
	("secp256r1", EC_SECP_256_R1),
	("secp384r1", EC_SECP_384_R1),
	("rsaEncryption", RSA_ENCRYPTION),
	("Ed25519", ED25519),
	("sha256WithRSAEncryption", SHA256_WITH_RSA_ENCRYPTION),
	("sha256withEcdsa", ECDSA_WITH_SHA256),
	("sha384withEcdsa", ECDSA_WITH_SHA384),
	("subjectKeyIdentifier", SUBJECT_KEY_IDENTIFIER),
	("keyUsage", KEY_USAGE),
	("subjectAlternativeName", SUBJECT_ALT_NAME),
	("basicConstraints", BASIC_CONSTRAINTS),
	("authorityKeyIdentifier", AUTHORITY_KEY_IDENTIFIER),
	("extKeyUsage", EXT_KEY_USAGE),
];

/// Returns the well-known name of `oid`, if it has one
pub fn name_of(oid: &ObjectIdentifier) -> Option<&'static str> {
	REGISTRY
		.iter()
		.find(|(_, components)| is(oid, components))
		.map(|(name, _)| *name)
}

/// Returns the identifier registered under `name`
///
/// ```
/// # use x509_tree::oid;
/// let cn = oid::lookup("commonName").unwrap();
/// assert_eq!(cn.to_string(), "2.5.4.3");
/// assert_eq!(oid::name_of(&cn), Some("commonName"));
/// ```
pub fn lookup(name: &str) -> Option<ObjectIdentifier> {
	REGISTRY
		.iter()
		.find(|(n, _)| *n == name)
		.map(|(_, components)| ObjectIdentifier::from_slice(components))
}

pub(crate) fn is(oid: &ObjectIdentifier, components: &[u64]) -> bool {
	oid.components().as_slice() == components
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_identifiers_pass_through() {
		let oid = ObjectIdentifier::from_slice(&[1, 2, 3, 4, 5]);
		assert_eq!(name_of(&oid), None);
		assert_eq!(lookup("notARealName"), None);
	}

	#[test]
	fn registry_names_are_unique() {
		for (i, (name, components)) in REGISTRY.iter().enumerate() {
			for (other_name, other_components) in &REGISTRY[i + 1..] {
				assert_ne!(name, other_name);
				assert_ne!(components, other_components);
			}
		}
	}

	#[test]
	fn signature_algorithms_are_registered() {
		let rsa = lookup("sha256WithRSAEncryption").unwrap();
		assert_eq!(rsa.to_string(), "1.2.840.113549.1.1.11");
		let ecdsa = lookup("sha256withEcdsa").unwrap();
		assert_eq!(ecdsa.to_string(), "1.2.840.10045.4.3.2");
	}
}
