use crate::conf::Config;
use crate::ils::Ils;
use crate::session::Session;
use sipcodec::Connection;
use std::io;
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use threadpool::ThreadPool;

/// If we get this many TCP errors in a row, with no successful
/// connections in between, exit.
const MAX_TCP_ERRORS: usize = 100;

/// How long the accept loop sleeps when no connection is pending,
/// in milliseconds.
const ACCEPT_POLL_INTERVAL: u64 = 1000;

/// Listens for SIP terminal connections and runs one Session per
/// connection on a worker thread.
pub struct Server {
    config: Arc<Config>,
    ils: Arc<dyn Ils>,
    shutdown: Arc<AtomicBool>,
    tcp_error_count: usize,
}

impl Server {
    pub fn new(config: Config, ils: Arc<dyn Ils>) -> Server {
        Server {
            config: Arc::new(config),
            ils,
            shutdown: Arc::new(AtomicBool::new(false)),
            tcp_error_count: 0,
        }
    }

    pub fn serve(&mut self) -> Result<(), String> {
        let bind = format!("{}:{}", self.config.sip_address, self.config.sip_port);

        let listener =
            TcpListener::bind(&bind).map_err(|e| format!("Cannot bind to {bind}: {e}"))?;

        listener
            .set_nonblocking(true)
            .map_err(|e| format!("Cannot configure listener: {e}"))?;

        for signal in [
            signal_hook::consts::SIGINT,
            signal_hook::consts::SIGTERM,
        ] {
            signal_hook::flag::register(signal, self.shutdown.clone())
                .map_err(|e| format!("Cannot register signal handler: {e}"))?;
        }

        log::info!("ACS server listening at {bind}");

        let pool = ThreadPool::new(self.config.max_clients);

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            let (stream, addr) = match listener.accept() {
                Ok(accepted) => accepted,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(ACCEPT_POLL_INTERVAL));
                    continue;
                }
                Err(e) => {
                    log::error!(
                        "accept() failed: error_count={} {e}",
                        self.tcp_error_count
                    );

                    self.tcp_error_count += 1;

                    if self.tcp_error_count > MAX_TCP_ERRORS {
                        // Net IO errors can happen for all kinds of
                        // reasons.  Break out rather than spin on a
                        // socket that's permanently broken.
                        return Err(String::from(
                            "Exiting on too many consecutive connect errors",
                        ));
                    }

                    continue;
                }
            };

            self.tcp_error_count = 0;

            log::info!("New SIP connection from {addr}");

            let config = self.config.clone();
            let ils = self.ils.clone();
            let shutdown = self.shutdown.clone();

            pool.execute(move || {
                // Accepted non-blocking; the session loop expects
                // timeout-driven reads.
                if let Err(e) = stream.set_nonblocking(false) {
                    log::error!("Cannot configure client stream: {e}");
                    return;
                }

                let mut connection = Connection::from_stream(stream);
                connection.set_ascii(config.ascii);

                let mut session = Session::new(config, ils, shutdown);

                if let Err(e) = session.run(&mut connection) {
                    // Not necessarily a problem; SIP clients disconnect
                    // by closing the socket.
                    log::info!("{session} exited with message: {e}");
                }

                connection.disconnect().ok();
            });
        }

        log::info!("ACS server shutting down");

        pool.join();

        Ok(())
    }
}
