use regex::Regex;
use std::sync::LazyLock;

/// Número decimal após a remoção dos separadores de milhar.
/// x: modo verbose (ignora espaços e permite comentários)
pub static RE_NUMERO_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^ [+-]?
        (?:
            \d+ (?:\.\d*)?  | # Ex: 1234, 1234.5, 1234.
            \.\d+             # Ex: .5
        )
        (?: [eE] [+-]? \d+ )? # Ex: 1.2e3
        $
        ",
    )
    .unwrap()
});

/// Ano inteiro, aceitando a forma decimal sem fração (ex: 2020.0).
pub static RE_ANO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?\d+)(?:\.0*)?$").unwrap());
