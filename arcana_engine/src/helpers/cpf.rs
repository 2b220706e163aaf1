//! CPF (Cadastro de Pessoas Físicas) validation.
//!
//! A CPF is an 11-digit Brazilian taxpayer id where the last two digits are check digits over the
//! first nine. The gateway rejects charges with an invalid `taxId`, so we validate at checkout
//! rather than letting the payment request fail later.

/// Returns true if `input` is a valid CPF. Punctuation (`123.456.789-09`) is tolerated; the check
/// runs over the digits only.
pub fn is_valid_cpf(input: &str) -> bool {
    let digits = input.chars().filter_map(|c| c.to_digit(10)).map(|d| d as u64).collect::<Vec<u64>>();
    if digits.len() != 11 || input.chars().any(|c| !c.is_ascii_digit() && c != '.' && c != '-' && c != ' ') {
        return false;
    }
    // All-same-digit sequences like 111.111.111-11 pass the arithmetic but are not valid CPFs.
    if digits.windows(2).all(|w| w[0] == w[1]) {
        return false;
    }
    check_digit(&digits, 9) == digits[9] && check_digit(&digits, 10) == digits[10]
}

/// The check digit over the first `n` digits: each digit is weighted `n+1 - i`, and the digit is
/// `(sum * 10) mod 11`, with 10 mapping to 0.
fn check_digit(digits: &[u64], n: usize) -> u64 {
    let sum = digits.iter().take(n).enumerate().map(|(i, d)| d * (n as u64 + 1 - i as u64)).sum::<u64>();
    sum * 10 % 11 % 10
}
