use api::{service, Classroom};
use db::Database;
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use model::Account;
use std::{convert::Infallible, env, fs, net::Ipv4Addr};
use tokio::{net::TcpListener, runtime::Runtime};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let port: u16 = env::var("PORT")?.parse()?;
    let directory = env::var("DIRECTORY")?;
    let capacity = match env::var("CHANGE_CAPACITY") {
        Ok(capacity) => capacity.parse()?,
        _ => db::DEFAULT_CAPACITY,
    };

    // Provision the identity directory
    let accounts: Vec<Account> = serde_json::from_slice(&fs::read(&directory)?)?;
    let count = accounts.len();
    let db = Database::with_capacity(capacity);
    for account in accounts {
        db.register(account);
    }
    log::info!("Loaded {count} accounts from {directory}.");
    let classroom = Classroom::from(db);

    let runtime = Runtime::new()?;
    runtime.block_on(async move {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
        log::info!("Listening on port {port}.");

        loop {
            let accepted = tokio::select! {
                biased;
                _ = tokio::signal::ctrl_c() => break,
                accepted = listener.accept() => accepted,
            };
            let (stream, addr) = match accepted {
                Ok(pair) => pair,
                Err(err) => {
                    log::error!("Failed to accept a connection: {err}");
                    continue;
                }
            };

            let outer = classroom.clone();
            tokio::spawn(async move {
                let handler = service_fn(move |req| {
                    let inner = outer.clone();
                    async move {
                        let res = service::try_respond(req, &inner).await.unwrap_or_else(service::empty);
                        Ok::<_, Infallible>(res)
                    }
                });
                if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(stream), handler).await {
                    log::error!("Connection with {addr} failed: {err}");
                }
            });
        }

        log::info!("Shutting down.");
        anyhow::Ok(())
    })
}
