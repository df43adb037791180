//! Command Line argument parsing
#![allow(missing_docs)]

use std::path::PathBuf;

use bpaf::Bpaf;

#[derive(Clone, Debug, Bpaf)]
#[bpaf(options)]
/// x509-inspect X.509 Certificate Inspector
pub struct Options {
	/// Certificate to inspect, PEM or DER
	#[bpaf(short, long, argument("cert.pem"))]
	pub cert: PathBuf,
	/// Certificate of the issuer, PEM or DER. The certificate is checked
	/// against its own key when left out.
	#[bpaf(short, long, argument("ca.pem"))]
	pub issuer: Option<PathBuf>,
	/// Log decoding and verification steps
	#[bpaf(short, long)]
	pub verbose: bool,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_options() {
		let opts = options()
			.run_inner(&["--cert", "leaf.pem", "-i", "ca.der"])
			.unwrap();
		assert_eq!(opts.cert, PathBuf::from("leaf.pem"));
		assert_eq!(opts.issuer, Some(PathBuf::from("ca.der")));
		assert!(!opts.verbose);

		let opts = options().run_inner(&["-c", "ca.pem", "-v"]).unwrap();
		assert_eq!(opts.issuer, None);
		assert!(opts.verbose);

		assert!(options().run_inner(&["--issuer", "ca.pem"]).is_err());
	}
}
