use serde_json::json;

use crate::config;

pub fn run(api_url: Option<&str>, json_output: bool) -> i32 {
    match config::init_config(api_url) {
        Ok(path) => {
            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "success": true,
                        "data": { "path": path.to_string_lossy() }
                    }))
                    .unwrap()
                );
            } else {
                println!("Initialized taskdeck at {}", path.display());
            }
            0
        }
        Err(e) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&crate::output::json::error(&e)).unwrap());
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}
