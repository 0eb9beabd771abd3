// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;
use std::io::BufRead;
use std::io::Write;

use anyhow::Context;

/// Prompts on stdout and reads one line from stdin. Input is echoed as
/// typed; the client secret is deliberately not masked.
pub fn prompt(label: &str) -> anyhow::Result<String> {
    let stdin = io::stdin();
    prompt_from(&mut stdin.lock(), &mut io::stdout(), label)
}

pub fn prompt_from<R, W>(input: &mut R, out: &mut W, label: &str) -> anyhow::Result<String>
where
    R: BufRead,
    W: Write,
{
    write!(out, "{label}").context("writing prompt")?;
    out.flush().context("flushing prompt")?;

    let mut line = String::new();
    input.read_line(&mut line).context("reading credential input")?;

    Ok(line.trim().to_string())
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_prompt_trims_the_line() {
        let mut input = Cursor::new(b"  my-tenant-id \n".to_vec());
        let mut out = Vec::new();

        let value =
            prompt_from(&mut input, &mut out, "Enter your Azure AD Tenant ID: ").unwrap();

        assert_eq!(value, "my-tenant-id");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Enter your Azure AD Tenant ID: "
        );
    }

    #[test]
    fn test_prompt_accepts_missing_trailing_newline() {
        let mut input = Cursor::new(b"secret-value".to_vec());
        let mut out = Vec::new();

        let value = prompt_from(&mut input, &mut out, "Enter your Client Secret: ").unwrap();

        assert_eq!(value, "secret-value");
    }
}
