use serde_json::json;

use crate::cli::open_store;
use crate::error::TaskdeckError;
use crate::output;
use crate::progress;

pub fn run(json_output: bool, api_url: Option<&str>) -> i32 {
    let result = run_inner(json_output, api_url);
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&output::json::error(&e)).unwrap());
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}

fn run_inner(json_output: bool, api_url: Option<&str>) -> Result<i32, TaskdeckError> {
    let mut store = open_store(api_url)?;
    let tasks = store.tasks()?;
    let summary = progress::board_summary(tasks);

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "status": output::json::board_summary_json(&summary)
            })))
            .unwrap()
        );
    } else {
        output::text::print_board_summary(&summary);
    }
    Ok(0)
}
