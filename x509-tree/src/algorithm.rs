use std::fmt;

use yasna::models::ObjectIdentifier;
use yasna::tags::{TAG_NULL, TAG_OID};
use yasna::{ASN1Result, BERReader, DERWriter};

use crate::{oid, Error};

/// The parameters field of an [`AlgorithmIdentifier`]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
#[non_exhaustive]
pub enum AlgorithmParameters {
	/// An explicit NULL, as used by the PKCS#1 algorithms
	Null,
	/// An object identifier, like the named curve of an EC key
	Oid(ObjectIdentifier),
	/// Any other parameters, as DER
	Der(Vec<u8>),
}

impl AlgorithmParameters {
	fn read(mut reader: BERReader) -> ASN1Result<Self> {
		let tag = reader.lookahead_tag()?;
		if tag == TAG_NULL {
			reader.read_null()?;
			Ok(AlgorithmParameters::Null)
		} else if tag == TAG_OID {
			Ok(AlgorithmParameters::Oid(reader.read_oid()?))
		} else {
			Ok(AlgorithmParameters::Der(reader.read_der()?))
		}
	}

	fn write(&self, writer: DERWriter) {
		match self {
			AlgorithmParameters::Null => writer.write_null(),
			AlgorithmParameters::Oid(oid) => writer.write_oid(oid),
			AlgorithmParameters::Der(der) => writer.write_der(der),
		}
	}
}

/// An algorithm identifier: an object identifier and optional parameters
///
/// Used for the signature algorithm of a certificate and its body, and for
/// the algorithm of public and private keys.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct AlgorithmIdentifier {
	algorithm: ObjectIdentifier,
	parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
	/// Creates an identifier from its parts
	pub fn new(algorithm: ObjectIdentifier, parameters: Option<AlgorithmParameters>) -> Self {
		Self {
			algorithm,
			parameters,
		}
	}
	/// The algorithm
	pub fn algorithm(&self) -> &ObjectIdentifier {
		&self.algorithm
	}
	/// The parameters, absent when the field was omitted
	pub fn parameters(&self) -> Option<&AlgorithmParameters> {
		self.parameters.as_ref()
	}

	pub(crate) fn read(reader: BERReader) -> ASN1Result<Self> {
		reader.read_sequence(|reader| {
			let algorithm = reader.next().read_oid()?;
			let parameters = reader.read_optional(AlgorithmParameters::read)?;
			Ok(Self {
				algorithm,
				parameters,
			})
		})
	}

	pub(crate) fn write(&self, writer: DERWriter) {
		writer.write_sequence(|writer| {
			writer.next().write_oid(&self.algorithm);
			if let Some(parameters) = &self.parameters {
				parameters.write(writer.next());
			}
		})
	}
}

/// The signature algorithms certificates can be checked with
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[non_exhaustive]
pub enum SignatureAlgorithm {
	/// sha256WithRSAEncryption, PKCS#1 v1.5 padding
	Sha256WithRsa,
	/// ecdsa-with-SHA256
	Sha256WithEcdsa,
}

impl SignatureAlgorithm {
	/// Maps an algorithm identifier to a signature algorithm
	///
	/// Identifiers outside the supported set are rejected with
	/// [`Error::UnsupportedSignatureAlgorithm`].
	pub fn from_oid(algorithm: &ObjectIdentifier) -> Result<Self, Error> {
		if oid::is(algorithm, oid::SHA256_WITH_RSA_ENCRYPTION) {
			Ok(SignatureAlgorithm::Sha256WithRsa)
		} else if oid::is(algorithm, oid::ECDSA_WITH_SHA256) {
			Ok(SignatureAlgorithm::Sha256WithEcdsa)
		} else {
			Err(Error::UnsupportedSignatureAlgorithm(algorithm.to_string()))
		}
	}
	/// The identifier of the algorithm
	pub fn oid(&self) -> ObjectIdentifier {
		ObjectIdentifier::from_slice(match self {
			SignatureAlgorithm::Sha256WithRsa => oid::SHA256_WITH_RSA_ENCRYPTION,
			SignatureAlgorithm::Sha256WithEcdsa => oid::ECDSA_WITH_SHA256,
		})
	}
	/// Human readable name, e.g. `SHA-256 with RSA`
	pub fn name(&self) -> &'static str {
		match self {
			SignatureAlgorithm::Sha256WithRsa => "SHA-256 with RSA",
			SignatureAlgorithm::Sha256WithEcdsa => "SHA-256 with ECDSA",
		}
	}
	/// The identifier as it is written in certificates of this algorithm
	///
	/// RSA carries explicit NULL parameters, ECDSA omits them (RFC 5758).
	pub fn identifier(&self) -> AlgorithmIdentifier {
		let parameters = match self {
			SignatureAlgorithm::Sha256WithRsa => Some(AlgorithmParameters::Null),
			SignatureAlgorithm::Sha256WithEcdsa => None,
		};
		AlgorithmIdentifier::new(self.oid(), parameters)
	}
}

impl fmt::Display for SignatureAlgorithm {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}
