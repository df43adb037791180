use pki_types::CertificateDer;

use crate::Error;

/// The certificate API of the surrounding platform
///
/// Turns DER bytes into the certificate handles the rest of the system
/// works with.
pub trait CertificateService {
	/// Parses every certificate contained in `der`
	fn parse_certificates(&self, der: &[u8]) -> Result<Vec<CertificateDer<'static>>, Error>;
}

/// [`CertificateService`] that checks certificates with `x509-parser`
///
/// Accepts back to back DER certificates and yields one handle per certificate.
#[cfg(feature = "x509-parser")]
#[derive(Debug, Default, Clone, Copy)]
pub struct X509ParserService;

#[cfg(feature = "x509-parser")]
impl CertificateService for X509ParserService {
	fn parse_certificates(&self, der: &[u8]) -> Result<Vec<CertificateDer<'static>>, Error> {
		use x509_parser::prelude::{FromDer, X509Certificate};

		let mut certificates = Vec::new();
		let mut rest = der;
		while !rest.is_empty() {
			let (remaining, _) = X509Certificate::from_der(rest)
				.map_err(|e| Error::InvalidCertificate(e.to_string()))?;
			let consumed = rest.len() - remaining.len();
			certificates.push(CertificateDer::from(rest[..consumed].to_vec()));
			rest = remaining;
		}
		Ok(certificates)
	}
}

/// Asks `service` for the certificates in `der`, which must be exactly one
pub(crate) fn parse_single_certificate(
	service: &impl CertificateService,
	der: &[u8],
) -> Result<CertificateDer<'static>, Error> {
	let certificates = service.parse_certificates(der).map_err(|e| match e {
		Error::InvalidCertificate(_) => e,
		other => Error::InvalidCertificate(other.to_string()),
	})?;
	let count = certificates.len();
	let [certificate] = <[_; 1]>::try_from(certificates).map_err(|_| {
		Error::InvalidCertificate(format!("expected exactly one certificate, found {count}"))
	})?;
	Ok(certificate)
}

#[cfg(test)]
mod tests {
	use super::*;

	// Yields `n` copies of its input, or fails when `None`
	struct Fixed(Option<usize>);

	impl CertificateService for Fixed {
		fn parse_certificates(&self, der: &[u8]) -> Result<Vec<CertificateDer<'static>>, Error> {
			match self.0 {
				Some(n) => Ok(vec![CertificateDer::from(der.to_vec()); n]),
				None => Err(Error::CouldNotParseCertificate),
			}
		}
	}

	#[test]
	fn exactly_one() {
		let cert = parse_single_certificate(&Fixed(Some(1)), &[1, 2, 3]).unwrap();
		assert_eq!(cert.as_ref(), &[1, 2, 3]);
	}

	#[test]
	fn zero_or_many_are_invalid() {
		for n in [0, 2] {
			let err = parse_single_certificate(&Fixed(Some(n)), &[1]).unwrap_err();
			assert_eq!(
				err,
				Error::InvalidCertificate(format!(
					"expected exactly one certificate, found {n}"
				))
			);
		}
	}

	#[test]
	fn service_errors_become_invalid_certificate() {
		let err = parse_single_certificate(&Fixed(None), &[1]).unwrap_err();
		assert!(matches!(err, Error::InvalidCertificate(_)));
	}

	#[cfg(feature = "x509-parser")]
	#[test]
	fn x509_parser_rejects_garbage() {
		let err = X509ParserService.parse_certificates(&[0x30, 0x00]).unwrap_err();
		assert!(matches!(err, Error::InvalidCertificate(_)));
		assert_eq!(X509ParserService.parse_certificates(&[]), Ok(vec![]));
	}
}
