#[cfg(feature = "aws_lc_rs")]
pub(crate) use aws_lc_rs::*;
#[cfg(all(feature = "ring", not(feature = "aws_lc_rs")))]
pub(crate) use ring::*;

/// Checks `signature` over `message` with a raw public key.
///
/// Both backends report a bad signature and a malformed key through the same
/// unspecified error, so either yields `false`.
pub(crate) fn verify_signature(
	alg: &'static dyn signature::VerificationAlgorithm,
	public_key: &[u8],
	message: &[u8],
	sig: &[u8],
) -> bool {
	signature::UnparsedPublicKey::new(alg, public_key)
		.verify(message, sig)
		.is_ok()
}

#[cfg(not(any(feature = "ring", feature = "aws_lc_rs")))]
compile_error!("At least one of the 'ring' or 'aws_lc_rs' features must be activated");
