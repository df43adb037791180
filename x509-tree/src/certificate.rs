use std::fmt;

#[cfg(feature = "pem")]
use pem::Pem;
use pki_types::CertificateDer;
use yasna::{ASN1Result, BERReader, DERWriter, Tag};

use crate::der::{self, read_time, write_time};
#[cfg(feature = "pem")]
use crate::error::ExternalError;
use crate::platform::{parse_single_certificate, CertificateService};
#[cfg(feature = "x509-parser")]
use crate::platform::X509ParserService;
use crate::verify::{RingVerifier, SignatureVerifier};
#[cfg(feature = "pem")]
use crate::ENCODE_CONFIG;
use crate::{
	oid, AlgorithmIdentifier, AttributeValue, BitString, Error, Extension, Name,
	SignatureAlgorithm, SubjectPublicKeyInfo,
};

/// A decoded X.509 certificate
///
/// The tree mirrors the ASN.1 structure of
/// [RFC 5280 Section 4.1](https://www.rfc-editor.org/rfc/rfc5280#section-4.1).
/// Values are immutable once built, either by [`Certificate::from_der`] or
/// from their parts with [`Certificate::new`].
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Certificate {
	tbs_certificate: TbsCertificate,
	signature_algorithm: AlgorithmIdentifier,
	signature_value: BitString,
}

impl Certificate {
	/// Assembles a certificate from a body and a signature over its DER encoding
	pub fn new(
		tbs_certificate: TbsCertificate,
		signature_algorithm: AlgorithmIdentifier,
		signature_value: BitString,
	) -> Self {
		Self {
			tbs_certificate,
			signature_algorithm,
			signature_value,
		}
	}
	/// The signed body
	pub fn tbs_certificate(&self) -> &TbsCertificate {
		&self.tbs_certificate
	}
	/// The signature algorithm identifier outside of the signed body
	pub fn signature_algorithm(&self) -> &AlgorithmIdentifier {
		&self.signature_algorithm
	}
	/// The raw signature
	pub fn signature_value(&self) -> &BitString {
		&self.signature_value
	}
	/// The subject's first common name
	pub fn common_name(&self) -> Option<&AttributeValue> {
		self.tbs_certificate.subject.find(oid::COMMON_NAME)
	}
	/// The subject's first organizational unit name
	pub fn organizational_unit_name(&self) -> Option<&AttributeValue> {
		self.tbs_certificate.subject.find(oid::ORG_UNIT_NAME)
	}
	/// The subject alternative name extension
	pub fn subject_alternative_names(&self) -> Result<&Extension, Error> {
		self.tbs_certificate.required_extension(oid::SUBJECT_ALT_NAME)
	}
	/// The basic constraints extension
	pub fn basic_constraints(&self) -> Result<&Extension, Error> {
		self.tbs_certificate.required_extension(oid::BASIC_CONSTRAINTS)
	}
	/// Maps the outer signature algorithm identifier to a signature algorithm
	pub fn signature_algorithm_name(&self) -> Result<SignatureAlgorithm, Error> {
		SignatureAlgorithm::from_oid(self.signature_algorithm.algorithm())
	}
	/// Whether the outer signature algorithm identifier equals the one in the signed body
	///
	/// RFC 5280 requires them to be equal, but [`Certificate::check_signature`]
	/// does not enforce it.
	pub fn signature_algorithms_agree(&self) -> bool {
		self.signature_algorithm == self.tbs_certificate.signature
	}
	/// Checks whether this certificate was signed by the holder of `issuer_public_key`
	///
	/// The signed body is encoded to DER again and verified with the algorithm
	/// named inside the body. Returns `Ok(false)` for a signature that does
	/// not match.
	pub fn check_signature(&self, issuer_public_key: &SubjectPublicKeyInfo) -> Result<bool, Error> {
		self.check_signature_with(issuer_public_key, &RingVerifier)
	}
	/// Like [`Certificate::check_signature`], with the given signature primitive
	pub fn check_signature_with(
		&self,
		issuer_public_key: &SubjectPublicKeyInfo,
		verifier: &impl SignatureVerifier,
	) -> Result<bool, Error> {
		let algorithm = self.tbs_certificate.signature_algorithm_name()?;
		if !self.signature_algorithms_agree() {
			log::warn!(
				"signature algorithm {} does not match {} of the signed body, using the latter",
				self.signature_algorithm.algorithm(),
				self.tbs_certificate.signature.algorithm()
			);
		}
		let tbs = self.tbs_certificate.to_der()?;
		verifier.verify(algorithm, issuer_public_key, &tbs, &self.signature_value)
	}
	/// Converts the tree into a certificate handle of the platform
	#[cfg(feature = "x509-parser")]
	pub fn to_x509_certificate(&self) -> Result<CertificateDer<'static>, Error> {
		self.to_x509_certificate_with(&X509ParserService)
	}
	/// Like [`Certificate::to_x509_certificate`], with the given platform service
	///
	/// The service must find exactly one certificate in the encoding of this
	/// tree, anything else is an [`Error::InvalidCertificate`].
	pub fn to_x509_certificate_with(
		&self,
		service: &impl CertificateService,
	) -> Result<CertificateDer<'static>, Error> {
		let der = self.to_der()?;
		parse_single_certificate(service, &der)
	}
	/// Parses a DER encoded certificate
	pub fn from_der(der: &[u8]) -> Result<Self, Error> {
		der::parse(der, Error::CouldNotParseCertificate, Self::read)
	}
	/// Parses a PEM encoded certificate
	#[cfg(feature = "pem")]
	pub fn from_pem(pem_str: &str) -> Result<Self, Error> {
		let certificate = pem::parse(pem_str)._err()?;
		Self::from_der(certificate.contents())
	}
	/// Serializes the certificate to DER
	pub fn to_der(&self) -> Result<Vec<u8>, Error> {
		yasna::try_construct_der(|writer| self.write(writer))
	}
	/// Serializes the certificate to the ASCII PEM format
	#[cfg(feature = "pem")]
	pub fn pem(&self) -> Result<String, Error> {
		let p = Pem::new("CERTIFICATE", self.to_der()?);
		Ok(pem::encode_config(&p, ENCODE_CONFIG))
	}

	fn read(reader: BERReader) -> ASN1Result<Self> {
		reader.read_sequence(|reader| {
			let tbs_certificate = TbsCertificate::read(reader.next())?;
			let signature_algorithm = AlgorithmIdentifier::read(reader.next())?;
			let signature_value = BitString::read(reader.next())?;
			Ok(Self {
				tbs_certificate,
				signature_algorithm,
				signature_value,
			})
		})
	}

	fn write(&self, writer: DERWriter) -> Result<(), Error> {
		writer.write_sequence(|writer| {
			self.tbs_certificate.write(writer.next())?;
			self.signature_algorithm.write(writer.next());
			self.signature_value.write(writer.next());
			Ok(())
		})
	}
}

impl TryFrom<&CertificateDer<'_>> for Certificate {
	type Error = Error;

	fn try_from(der: &CertificateDer<'_>) -> Result<Self, Self::Error> {
		Self::from_der(der)
	}
}

/// The to-be-signed body of a [`Certificate`]
///
/// Whether optional fields are legal for the version is not checked.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct TbsCertificate {
	version: Version,
	serial_number: SerialNumber,
	signature: AlgorithmIdentifier,
	issuer: Name,
	validity: Validity,
	subject: Name,
	subject_public_key_info: SubjectPublicKeyInfo,
	issuer_unique_id: Option<BitString>,
	subject_unique_id: Option<BitString>,
	extensions: Vec<Extension>,
}

impl TbsCertificate {
	/// Creates a version 3 body without unique identifiers or extensions
	pub fn new(
		serial_number: SerialNumber,
		signature: AlgorithmIdentifier,
		issuer: Name,
		validity: Validity,
		subject: Name,
		subject_public_key_info: SubjectPublicKeyInfo,
	) -> Self {
		Self {
			version: Version::V3,
			serial_number,
			signature,
			issuer,
			validity,
			subject,
			subject_public_key_info,
			issuer_unique_id: None,
			subject_unique_id: None,
			extensions: Vec::new(),
		}
	}
	/// Sets the version
	pub fn with_version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}
	/// Sets the issuer and subject unique identifiers
	pub fn with_unique_ids(
		mut self,
		issuer_unique_id: Option<BitString>,
		subject_unique_id: Option<BitString>,
	) -> Self {
		self.issuer_unique_id = issuer_unique_id;
		self.subject_unique_id = subject_unique_id;
		self
	}
	/// Sets the extensions
	pub fn with_extensions(mut self, extensions: Vec<Extension>) -> Self {
		self.extensions = extensions;
		self
	}
	/// The version
	pub fn version(&self) -> Version {
		self.version
	}
	/// The serial number
	pub fn serial_number(&self) -> &SerialNumber {
		&self.serial_number
	}
	/// The signature algorithm identifier inside the signed body
	pub fn signature(&self) -> &AlgorithmIdentifier {
		&self.signature
	}
	/// The issuer name
	pub fn issuer(&self) -> &Name {
		&self.issuer
	}
	/// The validity period
	pub fn validity(&self) -> &Validity {
		&self.validity
	}
	/// The subject name
	pub fn subject(&self) -> &Name {
		&self.subject
	}
	/// The subject's public key
	pub fn subject_public_key_info(&self) -> &SubjectPublicKeyInfo {
		&self.subject_public_key_info
	}
	/// The issuer unique identifier, a version 2 field
	pub fn issuer_unique_id(&self) -> Option<&BitString> {
		self.issuer_unique_id.as_ref()
	}
	/// The subject unique identifier, a version 2 field
	pub fn subject_unique_id(&self) -> Option<&BitString> {
		self.subject_unique_id.as_ref()
	}
	/// The extensions, in certificate order
	pub fn extensions(&self) -> &[Extension] {
		&self.extensions
	}
	/// The first extension with the given identifier
	pub fn extension(&self, extn_id: &[u64]) -> Option<&Extension> {
		self.extensions
			.iter()
			.find(|ext| oid::is(ext.extn_id(), extn_id))
	}
	/// Maps the signature algorithm identifier to a signature algorithm
	pub fn signature_algorithm_name(&self) -> Result<SignatureAlgorithm, Error> {
		SignatureAlgorithm::from_oid(self.signature.algorithm())
	}
	/// Parses a DER encoded body
	pub fn from_der(der: &[u8]) -> Result<Self, Error> {
		der::parse(der, Error::CouldNotParseCertificate, Self::read)
	}
	/// Serializes the body to DER, the bytes a signature is computed over
	pub fn to_der(&self) -> Result<Vec<u8>, Error> {
		yasna::try_construct_der(|writer| self.write(writer))
	}

	fn required_extension(&self, extn_id: &[u64]) -> Result<&Extension, Error> {
		self.extension(extn_id).ok_or_else(|| {
			Error::NotFound(yasna::models::ObjectIdentifier::from_slice(extn_id).to_string())
		})
	}

	fn read(reader: BERReader) -> ASN1Result<Self> {
		reader.read_sequence(|reader| {
			let version = reader
				.read_optional(|reader| reader.read_tagged(Tag::context(0), Version::read))?
				.unwrap_or(Version::V1);
			let serial_number = SerialNumber::read(reader.next())?;
			let signature = AlgorithmIdentifier::read(reader.next())?;
			let issuer = Name::read(reader.next())?;
			let validity = Validity::read(reader.next())?;
			let subject = Name::read(reader.next())?;
			let subject_public_key_info = SubjectPublicKeyInfo::read(reader.next())?;
			let issuer_unique_id = reader.read_optional(|reader| {
				reader.read_tagged_implicit(Tag::context(1), BitString::read)
			})?;
			let subject_unique_id = reader.read_optional(|reader| {
				reader.read_tagged_implicit(Tag::context(2), BitString::read)
			})?;
			let extensions = reader
				.read_optional(|reader| {
					reader.read_tagged(Tag::context(3), |reader| {
						let mut extensions = Vec::new();
						reader.read_sequence_of(|reader| {
							extensions.push(Extension::read(reader)?);
							Ok(())
						})?;
						Ok(extensions)
					})
				})?
				.unwrap_or_default();
			Ok(Self {
				version,
				serial_number,
				signature,
				issuer,
				validity,
				subject,
				subject_public_key_info,
				issuer_unique_id,
				subject_unique_id,
				extensions,
			})
		})
	}

	fn write(&self, writer: DERWriter) -> Result<(), Error> {
		writer.write_sequence(|writer| {
			// DEFAULT v1 is left out
			if self.version != Version::V1 {
				writer
					.next()
					.write_tagged(Tag::context(0), |writer| self.version.write(writer));
			}
			self.serial_number.write(writer.next());
			self.signature.write(writer.next());
			self.issuer.write(writer.next());
			self.validity.write(writer.next())?;
			self.subject.write(writer.next());
			self.subject_public_key_info.write(writer.next());
			if let Some(id) = &self.issuer_unique_id {
				writer
					.next()
					.write_tagged_implicit(Tag::context(1), |writer| id.write(writer));
			}
			if let Some(id) = &self.subject_unique_id {
				writer
					.next()
					.write_tagged_implicit(Tag::context(2), |writer| id.write(writer));
			}
			if !self.extensions.is_empty() {
				writer.next().write_tagged(Tag::context(3), |writer| {
					writer.write_sequence(|writer| {
						for extension in &self.extensions {
							extension.write(writer.next());
						}
					})
				});
			}
			Ok(())
		})
	}
}

/// The version of a certificate
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum Version {
	/// Version 1, encoded as 0
	V1,
	/// Version 2, encoded as 1
	V2,
	/// Version 3, encoded as 2
	#[default]
	V3,
}

impl Version {
	fn read(reader: BERReader) -> ASN1Result<Self> {
		match reader.read_u8()? {
			0 => Ok(Version::V1),
			1 => Ok(Version::V2),
			2 => Ok(Version::V3),
			_ => der::invalid(),
		}
	}

	fn write(&self, writer: DERWriter) {
		writer.write_u8(match self {
			Version::V1 => 0,
			Version::V2 => 1,
			Version::V3 => 2,
		})
	}
}

/// A certificate serial number
///
/// Serial numbers are arbitrary precision integers, kept as sign and
/// magnitude so equal values compare equal however they were built.
/// Conforming CAs only issue positive ones, but a negative serial number
/// read from a certificate is kept.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct SerialNumber {
	/// Big endian magnitude without leading zeros, `[0]` for zero
	inner: Vec<u8>,
	negative: bool,
}

impl SerialNumber {
	/// Create a positive serial number from its big endian bytes.
	///
	/// Leading zero bytes do not change the value and are dropped.
	pub fn from_slice(bytes: &[u8]) -> SerialNumber {
		SerialNumber {
			inner: strip_leading_zeros(bytes),
			negative: false,
		}
	}

	/// Return the big endian magnitude of the serial number.
	pub fn to_bytes(&self) -> Vec<u8> {
		self.inner.clone()
	}

	/// Whether the serial number is below zero
	pub fn is_negative(&self) -> bool {
		self.negative
	}

	fn read(reader: BERReader) -> ASN1Result<Self> {
		let (mut bytes, non_negative) = reader.read_bigint_bytes()?;
		if !non_negative {
			negate(&mut bytes);
		}
		Ok(SerialNumber {
			inner: strip_leading_zeros(&bytes),
			negative: !non_negative,
		})
	}

	fn write(&self, writer: DERWriter) {
		if self.negative {
			let mut bytes = Vec::with_capacity(self.inner.len() + 1);
			bytes.push(0);
			bytes.extend_from_slice(&self.inner);
			negate(&mut bytes);
			writer.write_bigint_bytes(&bytes, false);
		} else {
			writer.write_bigint_bytes(&self.inner, true);
		}
	}
}

/// Two's complement negation in place, at the width of `bytes`
fn negate(bytes: &mut [u8]) {
	for b in bytes.iter_mut() {
		*b = !*b;
	}
	for b in bytes.iter_mut().rev() {
		let (sum, carry) = b.overflowing_add(1);
		*b = sum;
		if !carry {
			break;
		}
	}
}

fn strip_leading_zeros(bytes: &[u8]) -> Vec<u8> {
	match bytes.iter().position(|b| *b != 0) {
		Some(start) => bytes[start..].to_vec(),
		None => vec![0],
	}
}

impl fmt::Display for SerialNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
		let hex: Vec<_> = self.inner.iter().map(|b| format!("{:02x}", b)).collect();
		if self.negative {
			f.write_str("-")?;
		}
		write!(f, "{}", hex.join(":"))
	}
}

impl From<u64> for SerialNumber {
	fn from(u: u64) -> SerialNumber {
		SerialNumber::from_slice(&u.to_be_bytes())
	}
}

impl AsRef<[u8]> for SerialNumber {
	fn as_ref(&self) -> &[u8] {
		&self.inner
	}
}

/// The validity period of a certificate, in seconds since the Unix epoch
///
/// `not_before` is expected to be at most `not_after`; this is not enforced.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Validity {
	not_before: i64,
	not_after: i64,
}

impl Validity {
	/// Creates a validity period
	pub fn new(not_before: i64, not_after: i64) -> Self {
		Self {
			not_before,
			not_after,
		}
	}
	/// Start of the period
	pub fn not_before(&self) -> i64 {
		self.not_before
	}
	/// End of the period, inclusive
	pub fn not_after(&self) -> i64 {
		self.not_after
	}

	fn read(reader: BERReader) -> ASN1Result<Self> {
		reader.read_sequence(|reader| {
			let not_before = read_time(reader.next())?;
			let not_after = read_time(reader.next())?;
			Ok(Self {
				not_before,
				not_after,
			})
		})
	}

	fn write(&self, writer: DERWriter) -> Result<(), Error> {
		writer.write_sequence(|writer| {
			write_time(writer.next(), self.not_before)?;
			write_time(writer.next(), self.not_after)
		})
	}
}

#[cfg(test)]
mod tests {
	use yasna::models::ObjectIdentifier;

	use super::*;
	use crate::{AlgorithmParameters, BasicConstraints, ExtensionValue};

	fn tbs() -> TbsCertificate {
		let name = Name::from_attributes([(
			ObjectIdentifier::from_slice(oid::COMMON_NAME),
			"crabs.crabs".into(),
		)]);
		let spki = SubjectPublicKeyInfo::new(
			AlgorithmIdentifier::new(
				ObjectIdentifier::from_slice(oid::EC_PUBLIC_KEY),
				Some(AlgorithmParameters::Oid(ObjectIdentifier::from_slice(
					oid::EC_SECP_256_R1,
				))),
			),
			BitString::from_bytes(vec![4; 65]),
		);
		TbsCertificate::new(
			SerialNumber::from(0x1F2E3D),
			SignatureAlgorithm::Sha256WithEcdsa.identifier(),
			name.clone(),
			Validity::new(1_704_844_800, 2_020_464_000),
			name,
			spki,
		)
	}

	#[test]
	fn tbs_round_trip() {
		let tbs = tbs().with_extensions(vec![Extension::new(
			ObjectIdentifier::from_slice(oid::BASIC_CONSTRAINTS),
			true,
			ExtensionValue::BasicConstraints(BasicConstraints::new(false, None)),
		)]);
		let der = tbs.to_der().unwrap();
		assert_eq!(TbsCertificate::from_der(&der).unwrap(), tbs);
	}

	#[test]
	fn v1_version_is_omitted() {
		let v1 = tbs().with_version(Version::V1);
		let der = v1.to_der().unwrap();
		// SEQUENCE header, then straight to the serial number
		assert_eq!(der[2], 0x02);
		let back = TbsCertificate::from_der(&der).unwrap();
		assert_eq!(back.version(), Version::V1);

		let v3 = tbs().to_der().unwrap();
		assert_eq!(&v3[2..7], &[0xa0, 0x03, 0x02, 0x01, 0x02]);
	}

	#[test]
	fn unique_ids() {
		let tbs = tbs()
			.with_version(Version::V2)
			.with_unique_ids(None, Some(BitString::from_bytes(vec![0xab])));
		let back = TbsCertificate::from_der(&tbs.to_der().unwrap()).unwrap();
		assert_eq!(back.issuer_unique_id(), None);
		assert_eq!(back.subject_unique_id().unwrap().as_bytes(), &[0xab]);
		assert_eq!(back, tbs);
	}

	fn serial_der(serial: &SerialNumber) -> Vec<u8> {
		yasna::construct_der(|writer| serial.write(writer))
	}

	#[test]
	fn serial_number_negative() {
		// -129
		let der = [0x02, 0x02, 0xff, 0x7f];
		let serial = yasna::parse_der(&der, SerialNumber::read).unwrap();
		assert!(serial.is_negative());
		assert_eq!(serial.to_bytes(), vec![0x81]);
		assert_eq!(serial.to_string(), "-81");
		assert_eq!(serial_der(&serial), der);

		// -128 fits a single octet
		let der = [0x02, 0x01, 0x80];
		let serial = yasna::parse_der(&der, SerialNumber::read).unwrap();
		assert_eq!(serial.to_string(), "-80");
		assert_eq!(serial_der(&serial), der);

		let der = [0x02, 0x03, 0xff, 0x00, 0x00];
		let serial = yasna::parse_der(&der, SerialNumber::read).unwrap();
		assert_eq!(serial.to_bytes(), vec![0x01, 0x00, 0x00]);
		assert_eq!(serial_der(&serial), der);
	}

	#[test]
	fn serial_number_positive() {
		// the sign octet is not part of the value
		let der = [0x02, 0x02, 0x00, 0x80];
		let serial = yasna::parse_der(&der, SerialNumber::read).unwrap();
		assert_eq!(serial, SerialNumber::from(0x80));
		assert_eq!(serial.to_bytes(), vec![0x80]);
		assert_eq!(serial.to_string(), "80");
		assert_eq!(serial_der(&SerialNumber::from(0x80)), der);

		assert_eq!(SerialNumber::from_slice(&[0x1f, 0x2e]).to_string(), "1f:2e");
		assert_eq!(SerialNumber::from_slice(&[0, 0, 0x1f]), SerialNumber::from(0x1f));
		assert_eq!(SerialNumber::from(0x1F2E).as_ref(), &[0x1f, 0x2e]);
		assert_eq!(SerialNumber::from(0).as_ref(), &[0]);
		assert_eq!(SerialNumber::from_slice(&[]), SerialNumber::from(0));
		assert_eq!(serial_der(&SerialNumber::from(0)), [0x02, 0x01, 0x00]);
	}

	#[test]
	fn unencodable_validity() {
		let tbs = TbsCertificate {
			validity: Validity::new(0, i64::MAX),
			..tbs()
		};
		assert_eq!(
			tbs.to_der(),
			Err(Error::InvalidValidityTimestamp(i64::MAX))
		);
	}

	#[test]
	fn missing_extensions() {
		let cert = Certificate::new(
			tbs(),
			SignatureAlgorithm::Sha256WithEcdsa.identifier(),
			BitString::default(),
		);
		assert_eq!(
			cert.subject_alternative_names(),
			Err(Error::NotFound("2.5.29.17".into()))
		);
		assert_eq!(
			cert.basic_constraints(),
			Err(Error::NotFound("2.5.29.19".into()))
		);
		assert_eq!(cert.common_name(), Some(&"crabs.crabs".into()));
		assert_eq!(cert.organizational_unit_name(), None);
		assert!(cert.signature_algorithms_agree());
	}

	#[test]
	fn trailing_data_is_rejected() {
		let cert = Certificate::new(
			tbs(),
			SignatureAlgorithm::Sha256WithEcdsa.identifier(),
			BitString::from_bytes(vec![1, 2, 3]),
		);
		let mut der = cert.to_der().unwrap();
		assert_eq!(Certificate::from_der(&der), Ok(cert));
		der.push(0);
		assert_eq!(
			Certificate::from_der(&der),
			Err(Error::CouldNotParseCertificate)
		);
	}
}
