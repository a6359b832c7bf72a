use std::cmp::Ordering;

// --- Tabelas de Referência ---

/// Categoria agregada: soma de todas as fontes, não é uma fatia do gráfico.
pub const GERACAO_TOTAL: &str = "Geração Total";

/// Agregado nacional, sempre a primeira opção do seletor de estados.
pub const ESTADO_BRASIL: &str = "BRASIL";

/// Nomes canônicos na ordem da tabela de rótulos.
///
/// Esta ordem define as colunas da distribuição e o desempate da categoria dominante.
pub const TIPOS_CANONICOS: [&str; 16] = [
    GERACAO_TOTAL,
    "Hidrelétrica",
    "Eólica",
    "Solar",
    "Nuclear",
    "Termelétrica",
    "Bagaço de Cana",
    "Lenha",
    "Lixívia",
    "Outras Renováveis",
    "Carvão",
    "Gás Natural",
    "Gás de Coqueria",
    "Óleo Combustível",
    "Óleo Diesel",
    "Outras Não Renováveis",
];

/// Rótulos bilíngues (português + inglês, separados por quebra de linha) da fonte de dados.
/// Comparação exata: rótulos desconhecidos retornam `None`.
pub fn canonizar_tipo_energia(rotulo: &str) -> Option<&'static str> {
    let canonico = match rotulo {
        "Geração total\n Total Generation" => GERACAO_TOTAL,
        "Hidro\n Hydro" => "Hidrelétrica",
        "Eólica \n Wind" => "Eólica",
        "Solar \n Solar" => "Solar",
        "Nuclear \n Nuclear" => "Nuclear",
        "Termo\n Thermal" => "Termelétrica",
        "Bagaço de cana \n Sugar Cane Bagasse" => "Bagaço de Cana",
        "Lenha\n Firewood" => "Lenha",
        "Lixívia\n Black Liquor" => "Lixívia",
        "Out. Fontes renováveis\n Other Renewable Sources" => "Outras Renováveis",
        "Carvão vapor\n Steam Coal" => "Carvão",
        "Gás natural\n Natural Gas" => "Gás Natural",
        "Gás de coqueria\n Coke Oven Gas" => "Gás de Coqueria",
        "Óleo combustível\n Fuel Oil" => "Óleo Combustível",
        "Óleo diesel\n Diesel Oil" => "Óleo Diesel",
        "Out. Fontes não renováveis\n Other Non-Renewable Sources" => "Outras Não Renováveis",
        _ => return None,
    };
    Some(canonico)
}

/// Aplica a tabela de rótulos; rótulos fora da tabela são mantidos sem alteração.
///
/// ```
/// use geracao_energia_por_estado::normalizar_tipo_energia;
///
/// assert_eq!(normalizar_tipo_energia("Hidro\n Hydro"), "Hidrelétrica");
/// assert_eq!(normalizar_tipo_energia("Biogás"), "Biogás");
/// ```
pub fn normalizar_tipo_energia(rotulo: &str) -> String {
    canonizar_tipo_energia(rotulo)
        .map(String::from)
        .unwrap_or_else(|| rotulo.to_string())
}

fn posicao_canonica(tipo: &str) -> Option<usize> {
    TIPOS_CANONICOS.iter().position(|&canonico| canonico == tipo)
}

/// Ordem fixa das colunas: primeiro a tabela canônica, depois os rótulos
/// desconhecidos em ordem alfabética.
pub fn comparar_tipos(a: &str, b: &str) -> Ordering {
    match (posicao_canonica(a), posicao_canonica(b)) {
        (Some(i), Some(j)) => i.cmp(&j),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todos_os_rotulos_da_tabela_sao_canonizados() {
        let rotulos = [
            "Geração total\n Total Generation",
            "Hidro\n Hydro",
            "Eólica \n Wind",
            "Solar \n Solar",
            "Nuclear \n Nuclear",
            "Termo\n Thermal",
            "Bagaço de cana \n Sugar Cane Bagasse",
            "Lenha\n Firewood",
            "Lixívia\n Black Liquor",
            "Out. Fontes renováveis\n Other Renewable Sources",
            "Carvão vapor\n Steam Coal",
            "Gás natural\n Natural Gas",
            "Gás de coqueria\n Coke Oven Gas",
            "Óleo combustível\n Fuel Oil",
            "Óleo diesel\n Diesel Oil",
            "Out. Fontes não renováveis\n Other Non-Renewable Sources",
        ];

        let canonicos: Vec<&str> = rotulos
            .iter()
            .filter_map(|r| canonizar_tipo_energia(r))
            .collect();

        assert_eq!(canonicos, TIPOS_CANONICOS);
    }

    #[test]
    fn comparacao_exata_sem_normalizar_espacos() {
        assert_eq!(canonizar_tipo_energia("Hidro\nHydro"), None);
        assert_eq!(canonizar_tipo_energia(" Hidro\n Hydro"), None);
        assert_eq!(normalizar_tipo_energia("Hidro\nHydro"), "Hidro\nHydro");
    }

    #[test]
    fn ordem_canonica_antes_dos_desconhecidos() {
        let mut tipos = vec!["Zeta", "Solar", "Alfa", "Hidrelétrica", "Eólica"];
        tipos.sort_by(|a, b| comparar_tipos(a, b));
        assert_eq!(tipos, ["Hidrelétrica", "Eólica", "Solar", "Alfa", "Zeta"]);
    }
}
