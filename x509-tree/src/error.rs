use std::fmt;

#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
/// The error type of the x509-tree crate
pub enum Error {
	/// The requested extension is not present in the certificate.
	///
	/// The payload is the dotted form of the extension identifier that was looked up.
	NotFound(String),
	/// The signature algorithm identifier is not one this crate can verify
	UnsupportedSignatureAlgorithm(String),
	/// The signature primitive rejected its input as malformed
	Signature(String),
	/// The bytes could not be turned into exactly one platform certificate
	InvalidCertificate(String),
	/// The given certificate couldn't be parsed
	CouldNotParseCertificate,
	/// The given private key document couldn't be parsed
	CouldNotParseKeyPair,
	/// A validity timestamp is outside of what DER times can express
	InvalidValidityTimestamp(i64),
	#[cfg(feature = "pem")]
	/// Error returned by the pem crate
	PemError(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		use self::Error::*;
		match self {
			NotFound(oid) => write!(f, "No extension with identifier {oid} in certificate")?,
			UnsupportedSignatureAlgorithm(oid) => {
				write!(f, "Unexpected signature algorithm {oid}")?
			},
			Signature(reason) => write!(f, "Malformed signature input: {reason}")?,
			InvalidCertificate(reason) => write!(f, "Invalid certificate: {reason}")?,
			CouldNotParseCertificate => write!(f, "Could not parse certificate")?,
			CouldNotParseKeyPair => write!(f, "Could not parse private key info")?,
			InvalidValidityTimestamp(ts) => write!(
				f,
				"Validity timestamp {ts} cannot be represented as an ASN.1 time"
			)?,
			#[cfg(feature = "pem")]
			PemError(e) => write!(f, "PEM error: {e}")?,
		};
		Ok(())
	}
}

impl std::error::Error for Error {}

/// A trait describing an error that can be converted into an `x509_tree::Error`.
///
/// We use this trait to avoid leaking external error types into the public API
/// through a `From<x> for Error` implementation.
pub(crate) trait ExternalError<T>: Sized {
	fn _err(self) -> Result<T, Error>;
}

#[cfg(feature = "pem")]
impl<T> ExternalError<T> for Result<T, pem::PemError> {
	fn _err(self) -> Result<T, Error> {
		self.map_err(|e| Error::PemError(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_names_the_identifier() {
		let err = Error::UnsupportedSignatureAlgorithm("1.2.840.10045.4.3.3".into());
		assert_eq!(
			err.to_string(),
			"Unexpected signature algorithm 1.2.840.10045.4.3.3"
		);
		let err = Error::NotFound("2.5.29.17".into());
		assert!(err.to_string().contains("2.5.29.17"));
	}
}
