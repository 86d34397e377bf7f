use acsd::conf;
use acsd::demo::DemoIls;
use acsd::server::Server;
use std::sync::Arc;

const HELP_TEXT: &str = r#"
Options:

    --config-file <conf/acsd.yml>
        Server configuration file.

    --host <address>
    --port <port>
        Override the configured bind address.

"#;

fn main() {
    env_logger::init();

    let mut opts = getopts::Options::new();

    opts.optflag("h", "help", "");
    opts.optopt("", "config-file", "", "");
    opts.optopt("", "host", "", "");
    opts.optopt("", "port", "", "");

    let args: Vec<String> = std::env::args().collect();

    let options = opts
        .parse(&args[1..])
        .expect("Cannot parse command line options");

    if options.opt_present("help") {
        println!("{HELP_TEXT}");
        return;
    }

    let mut config = conf::Config::new();

    if let Some(filename) = options.opt_str("config-file") {
        if let Err(e) = config.read_yaml(&filename) {
            eprintln!("Cannot load configuration: {e}");
            std::process::exit(1);
        }
    }

    if let Some(host) = options.opt_str("host") {
        config.sip_address = host;
    }

    if let Some(port) = options.opt_str("port") {
        config.sip_port = port.parse().expect("--port requires a port number");
    }

    let ils = Arc::new(DemoIls::new(&config.institution));

    if let Err(e) = Server::new(config, ils).serve() {
        log::error!("ACS server exited with error: {e}");
        std::process::exit(1);
    }
}
