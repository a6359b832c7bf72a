use execution_time::ExecutionTime;
use std::process;

use geracao_energia_por_estado::{
    CacheDeDados, PainelResult, clear_screen, escolher_estado, escrever_html, gerar_html,
    get_config, imprimir_dominantes, imprimir_estados, imprimir_resumo_de_carga, imprimir_tabela,
    imprimir_versao_do_programa, iniciar_registro_de_eventos, listar_estados,
    montar_especificacao, processar_estado, processar_todos_os_estados, titulo_do_grafico,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("\n[ERRO CRÍTICO]: {err}");
        process::exit(1);
    }
}

fn run() -> PainelResult<()> {
    let timer = ExecutionTime::start();

    // 1. Obter Configurações
    let config = get_config()?;
    iniciar_registro_de_eventos(config.verbose)?;

    // 2. Setup inicial
    clear_screen(config.clear)?;
    imprimir_versao_do_programa();

    if config.verbose {
        println!("{:#?}\n", config);
    }

    // 3. Carregamento (uma única leitura por processo)
    let cache = CacheDeDados::new(&config.input, config.delimitador);
    let dados = cache.obter()?;
    imprimir_resumo_de_carga(&dados);

    // 4. Seletor de estados: BRASIL primeiro, demais em ordem alfabética
    let estados = listar_estados(&dados.registros);

    if config.listar_estados {
        imprimir_estados(&estados);
        return Ok(());
    }

    let selecionado = escolher_estado(&estados, config.estado.as_deref());

    // 5. Distribuição e dominantes do estado selecionado
    let resultado = processar_estado(&dados.registros, &selecionado);
    imprimir_dominantes(&resultado);

    if config.tabela {
        imprimir_tabela(&resultado.distribuicao);
    }

    // 6. Gráfico com todos os estados (processados em paralelo)
    if !config.sem_html {
        let resultados = processar_todos_os_estados(&dados.registros, &estados);
        let especificacao = montar_especificacao(
            &estados,
            &resultados,
            &selecionado,
            config.grafico,
            &dados.impressao_digital.to_string(),
        );
        let html = gerar_html(&especificacao, &titulo_do_grafico(&selecionado))?;
        escrever_html(&config.output, &html)?;

        println!(" Gráfico gravado em <{}>.\n", config.output.display());
    }

    timer.print_elapsed_time();

    Ok(())
}
