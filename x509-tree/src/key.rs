use std::fmt;

use yasna::{ASN1Result, BERReader, DERWriter, Tag};

use crate::der::{self, read_context_der};
#[cfg(feature = "pem")]
use crate::error::ExternalError;
use crate::{AlgorithmIdentifier, Error};

/// An ASN.1 BIT STRING
///
/// The bits are stored most significant first; the last `unused_bits` bits
/// of the final byte are padding.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Default)]
pub struct BitString {
	bytes: Vec<u8>,
	unused_bits: u8,
}

impl BitString {
	/// A bit string using every bit of `bytes`
	pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
		Self {
			bytes: bytes.into(),
			unused_bits: 0,
		}
	}
	/// The underlying bytes, including the padding bits of the final byte
	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}
	/// Number of padding bits at the end
	pub fn unused_bits(&self) -> u8 {
		self.unused_bits
	}
	/// Number of significant bits
	pub fn bit_len(&self) -> usize {
		self.bytes.len() * 8 - usize::from(self.unused_bits)
	}

	pub(crate) fn read(reader: BERReader) -> ASN1Result<Self> {
		let (bytes, bit_len) = reader.read_bitvec_bytes()?;
		let unused_bits = (bytes.len() * 8 - bit_len) as u8;
		Ok(Self { bytes, unused_bits })
	}

	pub(crate) fn write(&self, writer: DERWriter) {
		writer.write_bitvec_bytes(&self.bytes, self.bit_len());
	}
}

/// The public key of a certificate subject together with its algorithm
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct SubjectPublicKeyInfo {
	algorithm: AlgorithmIdentifier,
	subject_public_key: BitString,
}

impl SubjectPublicKeyInfo {
	/// Creates a key info from its parts
	pub fn new(algorithm: AlgorithmIdentifier, subject_public_key: BitString) -> Self {
		Self {
			algorithm,
			subject_public_key,
		}
	}
	/// The key algorithm, e.g. `rsaEncryption` or `id-ecPublicKey` with its curve
	pub fn algorithm(&self) -> &AlgorithmIdentifier {
		&self.algorithm
	}
	/// The encoded public key
	pub fn subject_public_key(&self) -> &BitString {
		&self.subject_public_key
	}
	/// Parses a DER encoded `SubjectPublicKeyInfo`
	pub fn from_der(der: &[u8]) -> Result<Self, Error> {
		der::parse(der, Error::CouldNotParseCertificate, Self::read)
	}
	/// Serializes to DER
	pub fn to_der(&self) -> Vec<u8> {
		yasna::construct_der(|writer| self.write(writer))
	}

	pub(crate) fn read(reader: BERReader) -> ASN1Result<Self> {
		reader.read_sequence(|reader| {
			let algorithm = AlgorithmIdentifier::read(reader.next())?;
			let subject_public_key = BitString::read(reader.next())?;
			Ok(Self {
				algorithm,
				subject_public_key,
			})
		})
	}

	pub(crate) fn write(&self, writer: DERWriter) {
		writer.write_sequence(|writer| {
			self.algorithm.write(writer.next());
			self.subject_public_key.write(writer.next());
		})
	}
}

/// A PKCS#8 private key document ([RFC 5958](https://www.rfc-editor.org/rfc/rfc5958))
///
/// Version 0 documents carry only the private key; version 1 documents may
/// also carry the public key.
#[derive(PartialEq, Eq, Hash, Clone)]
pub struct PrivateKeyInfo {
	version: u8,
	algorithm: AlgorithmIdentifier,
	private_key: Vec<u8>,
	attributes: Option<Vec<u8>>,
	public_key: Option<BitString>,
	// ring writes the [1] public key with an explicit tag, RFC 5958 uses an implicit one
	explicit_public_key_tag: bool,
}

impl PrivateKeyInfo {
	/// Creates a version 0 document
	pub fn new(algorithm: AlgorithmIdentifier, private_key: Vec<u8>) -> Self {
		Self {
			version: 0,
			algorithm,
			private_key,
			attributes: None,
			public_key: None,
			explicit_public_key_tag: false,
		}
	}
	/// Adds the public key, which makes this a version 1 document
	pub fn with_public_key(mut self, public_key: BitString) -> Self {
		self.version = 1;
		self.public_key = Some(public_key);
		self
	}
	/// The syntax version, 0 or 1
	pub fn version(&self) -> u8 {
		self.version
	}
	/// The key algorithm
	pub fn algorithm(&self) -> &AlgorithmIdentifier {
		&self.algorithm
	}
	/// The algorithm specific private key encoding
	pub fn private_key(&self) -> &[u8] {
		&self.private_key
	}
	/// The complete DER of the `[0]` attributes field, if present
	pub fn attributes(&self) -> Option<&[u8]> {
		self.attributes.as_deref()
	}
	/// The public key, if present
	pub fn public_key(&self) -> Option<&BitString> {
		self.public_key.as_ref()
	}
	/// Parses a DER encoded PKCS#8 document
	pub fn from_der(der: &[u8]) -> Result<Self, Error> {
		der::parse(der, Error::CouldNotParseKeyPair, Self::read)
	}
	/// Parses a PEM encoded PKCS#8 document
	#[cfg(feature = "pem")]
	pub fn from_pem(pem_str: &str) -> Result<Self, Error> {
		let private_key = pem::parse(pem_str)._err()?;
		Self::from_der(private_key.contents())
	}
	/// Serializes to DER
	pub fn to_der(&self) -> Vec<u8> {
		yasna::construct_der(|writer| self.write(writer))
	}

	pub(crate) fn read(reader: BERReader) -> ASN1Result<Self> {
		reader.read_sequence(|reader| {
			let version = reader.next().read_u8()?;
			if version > 1 {
				return der::invalid();
			}
			let algorithm = AlgorithmIdentifier::read(reader.next())?;
			let private_key = reader.next().read_bytes()?;
			let attributes = reader.read_optional(|reader| read_context_der(reader, 0))?;
			let public_key = reader.read_optional(|reader| read_context_der(reader, 1))?;
			let explicit_public_key_tag = matches!(public_key.as_deref(), Some([0xa1, ..]));
			let public_key = match public_key {
				Some(der) if explicit_public_key_tag => Some(yasna::parse_der(&der, |reader| {
					reader.read_tagged(Tag::context(1), BitString::read)
				})?),
				Some(der) => Some(yasna::parse_der(&der, |reader| {
					reader.read_tagged_implicit(Tag::context(1), BitString::read)
				})?),
				None => None,
			};
			Ok(Self {
				version,
				algorithm,
				private_key,
				attributes,
				public_key,
				explicit_public_key_tag,
			})
		})
	}

	pub(crate) fn write(&self, writer: DERWriter) {
		writer.write_sequence(|writer| {
			writer.next().write_u8(self.version);
			self.algorithm.write(writer.next());
			writer.next().write_bytes(&self.private_key);
			if let Some(attributes) = &self.attributes {
				writer.next().write_der(attributes);
			}
			if let Some(public_key) = &self.public_key {
				if self.explicit_public_key_tag {
					writer
						.next()
						.write_tagged(Tag::context(1), |writer| public_key.write(writer));
				} else {
					writer
						.next()
						.write_tagged_implicit(Tag::context(1), |writer| public_key.write(writer));
				}
			}
		})
	}
}

impl fmt::Debug for PrivateKeyInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PrivateKeyInfo")
			.field("version", &self.version)
			.field("algorithm", &self.algorithm)
			.field("private_key", &"[secret]")
			.field("attributes", &self.attributes)
			.field("public_key", &self.public_key)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use yasna::models::ObjectIdentifier;

	use super::*;
	use crate::{oid, AlgorithmParameters};

	#[test]
	fn bit_string_padding() {
		// BIT STRING with 3 unused bits
		let der = [0x03, 0x02, 0x03, 0xa8];
		let bits = yasna::parse_der(&der, BitString::read).unwrap();
		assert_eq!(bits.as_bytes(), &[0xa8]);
		assert_eq!(bits.unused_bits(), 3);
		assert_eq!(bits.bit_len(), 5);
		assert_eq!(yasna::construct_der(|writer| bits.write(writer)), der);
	}

	#[test]
	fn spki_round_trip() {
		let spki = SubjectPublicKeyInfo::new(
			AlgorithmIdentifier::new(
				ObjectIdentifier::from_slice(oid::EC_PUBLIC_KEY),
				Some(AlgorithmParameters::Oid(ObjectIdentifier::from_slice(
					oid::EC_SECP_256_R1,
				))),
			),
			BitString::from_bytes(vec![4; 65]),
		);
		let der = spki.to_der();
		assert_eq!(SubjectPublicKeyInfo::from_der(&der).unwrap(), spki);
		assert_eq!(
			SubjectPublicKeyInfo::from_der(&der[..der.len() - 1]),
			Err(Error::CouldNotParseCertificate)
		);
	}

	fn ed25519_key() -> PrivateKeyInfo {
		let alg = AlgorithmIdentifier::new(ObjectIdentifier::from_slice(oid::ED25519), None);
		// CurvePrivateKey ::= OCTET STRING
		let mut private_key = vec![0x04, 0x20];
		private_key.extend_from_slice(&[7; 32]);
		PrivateKeyInfo::new(alg, private_key)
	}

	#[test]
	fn private_key_versions() {
		let v0 = ed25519_key();
		let back = PrivateKeyInfo::from_der(&v0.to_der()).unwrap();
		assert_eq!(back.version(), 0);
		assert_eq!(back.public_key(), None);
		assert_eq!(back, v0);

		let v1 = ed25519_key().with_public_key(BitString::from_bytes(vec![9; 32]));
		let der = v1.to_der();
		let back = PrivateKeyInfo::from_der(&der).unwrap();
		assert_eq!(back.version(), 1);
		assert_eq!(back.public_key().unwrap().as_bytes(), &[9; 32]);
		assert_eq!(back.to_der(), der);
	}

	#[test]
	fn unknown_private_key_version() {
		let mut der = ed25519_key().to_der();
		// SEQUENCE header, then INTEGER 0
		assert_eq!(&der[2..5], &[0x02, 0x01, 0x00]);
		der[4] = 2;
		assert_eq!(
			PrivateKeyInfo::from_der(&der),
			Err(Error::CouldNotParseKeyPair)
		);
	}

	#[test]
	fn debug_hides_private_key() {
		let debug = format!("{:?}", ed25519_key());
		assert!(debug.contains("[secret]"));
		assert!(!debug.contains("7, 7"));
	}
}
