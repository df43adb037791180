use crate::ring_like::signature::{self, VerificationAlgorithm};
use crate::ring_like::verify_signature;
use crate::{oid, AlgorithmParameters, BitString, Error, SignatureAlgorithm, SubjectPublicKeyInfo};

/// A signature primitive that certificates are checked with
///
/// Implementations return `Ok(false)` when the signature does not match, and
/// reserve [`Error::Signature`] for input they cannot use at all.
pub trait SignatureVerifier: Send + Sync {
	/// Checks `signature` over `message` against `public_key`
	fn verify(
		&self,
		algorithm: SignatureAlgorithm,
		public_key: &SubjectPublicKeyInfo,
		message: &[u8],
		signature: &BitString,
	) -> Result<bool, Error>;
}

/// [`SignatureVerifier`] backed by *ring*, or *aws-lc-rs* with the `aws_lc_rs` feature
#[derive(Debug, Default, Clone, Copy)]
pub struct RingVerifier;

impl RingVerifier {
	fn verification_algorithm(
		algorithm: SignatureAlgorithm,
		public_key: &SubjectPublicKeyInfo,
	) -> Result<&'static dyn VerificationAlgorithm, Error> {
		let key_alg = public_key.algorithm();
		match algorithm {
			SignatureAlgorithm::Sha256WithRsa => {
				if !oid::is(key_alg.algorithm(), oid::RSA_ENCRYPTION) {
					return Err(Error::Signature(format!(
						"{algorithm} needs an RSA key, got {}",
						key_alg.algorithm()
					)));
				}
				Ok(&signature::RSA_PKCS1_2048_8192_SHA256)
			},
			SignatureAlgorithm::Sha256WithEcdsa => {
				if !oid::is(key_alg.algorithm(), oid::EC_PUBLIC_KEY) {
					return Err(Error::Signature(format!(
						"{algorithm} needs an EC key, got {}",
						key_alg.algorithm()
					)));
				}
				match key_alg.parameters() {
					Some(AlgorithmParameters::Oid(curve))
						if oid::is(curve, oid::EC_SECP_256_R1) =>
					{
						Ok(&signature::ECDSA_P256_SHA256_ASN1)
					},
					Some(AlgorithmParameters::Oid(curve))
						if oid::is(curve, oid::EC_SECP_384_R1) =>
					{
						Ok(&signature::ECDSA_P384_SHA256_ASN1)
					},
					other => Err(Error::Signature(format!(
						"unsupported curve parameters {other:?}"
					))),
				}
			},
		}
	}
}

impl SignatureVerifier for RingVerifier {
	fn verify(
		&self,
		algorithm: SignatureAlgorithm,
		public_key: &SubjectPublicKeyInfo,
		message: &[u8],
		signature: &BitString,
	) -> Result<bool, Error> {
		if signature.unused_bits() != 0 {
			return Err(Error::Signature(
				"signature is not a whole number of bytes".into(),
			));
		}
		let key = public_key.subject_public_key();
		if key.unused_bits() != 0 {
			return Err(Error::Signature(
				"public key is not a whole number of bytes".into(),
			));
		}
		let alg = Self::verification_algorithm(algorithm, public_key)?;
		let valid = verify_signature(alg, key.as_bytes(), message, signature.as_bytes());
		log::debug!(
			"{algorithm} signature over {} bytes: {}",
			message.len(),
			if valid { "valid" } else { "invalid" }
		);
		Ok(valid)
	}
}
