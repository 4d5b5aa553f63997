#[tokio::main]
async fn main() {
    let code = match hudcall_lib::run().await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "hudcall exited with error");
            eprintln!("hudcall: {e}");
            1
        }
    };
    // The stdin reader thread would otherwise keep the runtime alive until the next line.
    std::process::exit(code);
}
