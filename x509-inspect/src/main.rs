use std::process::ExitCode;

use anyhow::Context;
use x509_inspect::{load_certificate, verify, Description, Verdict};
mod args;

fn main() -> anyhow::Result<ExitCode> {
	let opts = args::options().run();

	let level = if opts.verbose { "debug" } else { "info" };
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

	let cert = load_certificate(&opts.cert)?;
	let issuer = opts.issuer.as_deref().map(load_certificate).transpose()?;

	print!("{}", Description(&cert));

	let verdict = verify(&cert, issuer.as_ref())?;
	match &opts.issuer {
		Some(path) => println!("signature ({}): {verdict}", path.display()),
		None => println!("signature (self-signed): {verdict}"),
	}

	let handle = cert
		.to_x509_certificate()
		.context("converting to a platform certificate")?;
	println!("platform certificate: {} bytes", handle.len());

	Ok(match verdict {
		Verdict::Valid => ExitCode::SUCCESS,
		Verdict::Invalid => ExitCode::FAILURE,
	})
}
