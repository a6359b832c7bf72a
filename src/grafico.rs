//! Gráfico de área empilhada (Vega-Lite) com a categoria dominante de cada ano.
//!
//! Os dados de todos os estados são embutidos na página; um seletor ligado ao
//! parâmetro `estado` filtra as duas camadas, de modo que a troca de estado
//! redesenha o gráfico no navegador.

use serde_json::{Value, json};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    EntradaDominante, PainelError, PainelResult, PontoPercentual, ResultadoEstado, comparar_tipos,
};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcoesDoGrafico {
    pub largura: u32,
    pub altura: u32,
}

impl Default for OpcoesDoGrafico {
    fn default() -> Self {
        OpcoesDoGrafico {
            largura: 1200,
            altura: 800,
        }
    }
}

pub fn titulo_do_grafico(estado: &str) -> String {
    format!("Geração de Energia por Tipo em {estado} (%)")
}

/// Domínio de cores comum a todos os estados, na ordem canônica das colunas.
fn dominio_de_cores(resultados: &[ResultadoEstado]) -> Vec<String> {
    let mut tipos: Vec<String> = Vec::new();

    for tipo in resultados
        .iter()
        .flat_map(|r| r.distribuicao.tipos.iter())
    {
        if !tipos.contains(tipo) {
            tipos.push(tipo.clone());
        }
    }

    tipos.sort_by(|a, b| comparar_tipos(a, b));
    tipos
}

/// Monta a especificação Vega-Lite.
///
/// * `estados` - opções do seletor, na ordem de exibição.
/// * `resultados` - distribuição e dominantes de cada estado.
/// * `selecionado` - estado exibido inicialmente; entra no seletor mesmo sem dados.
/// * `impressao_digital` - identificação do arquivo de origem, registrada na descrição.
pub fn montar_especificacao(
    estados: &[String],
    resultados: &[ResultadoEstado],
    selecionado: &str,
    opcoes: OpcoesDoGrafico,
    impressao_digital: &str,
) -> Value {
    let pontos: Vec<PontoPercentual> = resultados
        .iter()
        .flat_map(|r| r.distribuicao.para_formato_longo())
        .collect();

    let dominantes: Vec<&EntradaDominante> =
        resultados.iter().flat_map(|r| r.dominantes.iter()).collect();

    let mut opcoes_do_seletor: Vec<&str> = estados.iter().map(String::as_str).collect();
    if !opcoes_do_seletor.contains(&selecionado) {
        opcoes_do_seletor.push(selecionado);
    }

    let filtro_estado = json!({ "filter": "datum.estado === estado" });

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "description": format!("Geração de energia por tipo e estado (fonte blake3: {impressao_digital})"),
        "width": opcoes.largura,
        "height": opcoes.altura,
        "title": {
            "text": { "expr": "'Geração de Energia por Tipo em ' + estado + ' (%)'" }
        },
        "params": [{
            "name": "estado",
            "value": selecionado,
            "bind": {
                "input": "select",
                "options": opcoes_do_seletor,
                "name": "Selecione o estado "
            }
        }],
        "layer": [
            {
                "data": { "values": pontos },
                "transform": [filtro_estado],
                "mark": "area",
                "encoding": {
                    "x": { "field": "ano", "type": "ordinal", "title": "Ano" },
                    "y": {
                        "field": "percentual",
                        "type": "quantitative",
                        "stack": "zero",
                        "title": "Percentual (%)"
                    },
                    "color": {
                        "field": "tipo_energia",
                        "type": "nominal",
                        "title": "Tipo de Energia",
                        "scale": { "domain": dominio_de_cores(resultados) },
                        "legend": { "orient": "bottom" }
                    },
                    "tooltip": [
                        { "field": "ano", "type": "ordinal", "title": "Ano" },
                        { "field": "tipo_energia", "type": "nominal", "title": "Tipo de Energia" },
                        {
                            "field": "percentual",
                            "type": "quantitative",
                            "title": "Percentual",
                            "format": ".2f"
                        }
                    ]
                }
            },
            {
                "data": { "values": dominantes },
                "transform": [filtro_estado],
                "mark": { "type": "text", "align": "center", "baseline": "bottom", "dx": 3 },
                "encoding": {
                    "x": { "field": "ano", "type": "ordinal" },
                    "y": { "datum": 100, "type": "quantitative" },
                    "text": { "field": "tipo_energia", "type": "nominal" }
                }
            }
        ]
    })
}

/// Página HTML autônoma que renderiza a especificação com vega-embed.
pub fn gerar_html(especificacao: &Value, titulo: &str) -> PainelResult<String> {
    // "</" dentro do <script> encerraria o bloco antes da hora
    let spec = serde_json::to_string(especificacao)?.replace("</", "<\\/");

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8">
  <title>{titulo}</title>
  <script src="https://cdn.jsdelivr.net/npm/vega@5"></script>
  <script src="https://cdn.jsdelivr.net/npm/vega-lite@5"></script>
  <script src="https://cdn.jsdelivr.net/npm/vega-embed@6"></script>
</head>
<body>
  <div id="grafico"></div>
  <script>
    vegaEmbed("#grafico", {spec}, {{ "actions": false }});
  </script>
</body>
</html>
"##,
        titulo = escapar_html(titulo),
    ))
}

fn escapar_html(texto: &str) -> String {
    texto
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn escrever_html(path: &Path, html: &str) -> PainelResult<()> {
    let erro = |e| PainelError::IoWriter {
        source: e,
        arquivo: path.to_path_buf(),
    };

    let file = File::create(path).map_err(erro)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(html.as_bytes()).map_err(erro)?;
    writer.flush().map_err(erro)?;

    tracing::info!(arquivo = %path.display(), bytes = html.len(), "gráfico gravado");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RegistroGeracao, listar_estados, processar_todos_os_estados};

    fn registro(estado: &str, ano: i32, tipo: &str, geracao: f64) -> RegistroGeracao {
        RegistroGeracao {
            estado: estado.to_string(),
            ano: Some(ano),
            tipo_energia: tipo.to_string(),
            geracao: Some(geracao),
        }
    }

    fn especificacao_de_teste() -> Value {
        let registros = vec![
            registro("SP", 2020, "Solar", 30.0),
            registro("SP", 2020, "Hidrelétrica", 70.0),
            registro("BRASIL", 2020, "Eólica", 10.0),
            registro("BRASIL", 2020, "Hidrelétrica", 90.0),
            registro("BRASIL", 2021, "Hidrelétrica", 0.0),
        ];
        let estados = listar_estados(&registros);
        let resultados = processar_todos_os_estados(&registros, &estados);

        montar_especificacao(&estados, &resultados, "SP", OpcoesDoGrafico::default(), "abc")
    }

    #[test]
    fn seletor_lista_estados_com_brasil_primeiro() {
        let spec = especificacao_de_teste();
        let parametro = &spec["params"][0];

        assert_eq!(parametro["name"], "estado");
        assert_eq!(parametro["value"], "SP");
        assert_eq!(parametro["bind"]["input"], "select");
        assert_eq!(parametro["bind"]["options"], json!(["BRASIL", "SP"]));
    }

    #[test]
    fn camada_de_area_em_formato_longo() {
        let spec = especificacao_de_teste();
        let area = &spec["layer"][0];

        assert_eq!(area["mark"], "area");
        assert_eq!(area["encoding"]["x"]["type"], "ordinal");
        assert_eq!(area["encoding"]["y"]["stack"], "zero");
        assert_eq!(
            area["encoding"]["color"]["scale"]["domain"],
            json!(["Hidrelétrica", "Eólica", "Solar"])
        );

        let valores = area["data"]["values"].as_array().unwrap();
        // BRASIL: 2 anos x 2 tipos; SP: 1 ano x 2 tipos
        assert_eq!(valores.len(), 6);
        assert!(valores.iter().all(|v| v["percentual"].as_f64().is_some()));
        let solar_sp = valores
            .iter()
            .find(|v| v["estado"] == "SP" && v["tipo_energia"] == "Solar")
            .and_then(|v| v["percentual"].as_f64())
            .unwrap();
        assert!((solar_sp - 30.0).abs() < 1e-9);
    }

    #[test]
    fn camada_de_texto_com_dominantes() {
        let spec = especificacao_de_teste();
        let texto = &spec["layer"][1];

        assert_eq!(texto["mark"]["type"], "text");
        assert_eq!(texto["encoding"]["text"]["field"], "tipo_energia");

        // BRASIL/2021 tem total zero e não possui dominante
        let valores = texto["data"]["values"].as_array().unwrap();
        let pares: Vec<(String, i64)> = valores
            .iter()
            .map(|v| (v["estado"].as_str().unwrap().to_string(), v["ano"].as_i64().unwrap()))
            .collect();
        assert_eq!(pares, [("BRASIL".to_string(), 2020), ("SP".to_string(), 2020)]);
        assert_eq!(valores[0]["tipo_energia"], "Hidrelétrica");
    }

    #[test]
    fn estado_sem_dados_entra_no_seletor() {
        let registros = vec![registro("SP", 2020, "Solar", 1.0)];
        let estados = listar_estados(&registros);
        let resultados = processar_todos_os_estados(&registros, &estados);

        let spec = montar_especificacao(&estados, &resultados, "XX", OpcoesDoGrafico::default(), "");
        let parametro = &spec["params"][0];

        assert_eq!(parametro["value"], "XX");
        assert_eq!(parametro["bind"]["options"], json!(["SP", "XX"]));
        assert_eq!(estados, ["SP"]);
    }

    #[test]
    fn pagina_completa_com_especificacao_embutida() {
        let spec = especificacao_de_teste();
        let html = gerar_html(&spec, &titulo_do_grafico("SP")).unwrap();

        let esperado_inicio = "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n  <meta charset=\"utf-8\">\n  <title>Geração de Energia por Tipo em SP (%)</title>\n";
        assert!(html.starts_with(esperado_inicio), "{html}");
        assert!(html.ends_with("</body>\n</html>\n"));

        for biblioteca in ["vega@5", "vega-lite@5", "vega-embed@6"] {
            assert!(html.contains(&format!("https://cdn.jsdelivr.net/npm/{biblioteca}")));
        }

        // A especificação embutida é o mesmo JSON montado
        let inicio = html.find("vegaEmbed(\"#grafico\", ").unwrap() + "vegaEmbed(\"#grafico\", ".len();
        let fim = html.rfind(", { \"actions\": false });").unwrap();
        let embutida: Value = serde_json::from_str(&html[inicio..fim]).unwrap();
        assert_eq!(embutida["$schema"], VEGA_LITE_SCHEMA);
        assert_eq!(embutida["params"], spec["params"]);
        for camada in 0..2 {
            assert_eq!(embutida["layer"][camada]["mark"], spec["layer"][camada]["mark"]);
            assert_eq!(
                embutida["layer"][camada]["encoding"],
                spec["layer"][camada]["encoding"]
            );
            assert_eq!(
                embutida["layer"][camada]["data"]["values"].as_array().map(Vec::len),
                spec["layer"][camada]["data"]["values"].as_array().map(Vec::len)
            );
        }
    }

    #[test]
    fn html_autonomo_e_escapado() {
        let spec = json!({ "description": "</script><b>" });
        let html = gerar_html(&spec, &titulo_do_grafico("<SP>")).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("vegaEmbed(\"#grafico\""));
        assert!(html.contains("&lt;SP&gt;"));
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("<\\/script><b>"));
    }

    #[test]
    fn grava_o_arquivo_html() {
        let path = std::env::temp_dir().join(format!(
            "geracao_energia_{}_grafico.html",
            std::process::id()
        ));
        escrever_html(&path, "<html></html>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
        std::fs::remove_file(&path).unwrap();

        let err = escrever_html(Path::new("/nao/existe/grafico.html"), "x").unwrap_err();
        assert!(matches!(err, PainelError::IoWriter { .. }));
    }
}
