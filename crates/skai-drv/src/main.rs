use std::process::exit;

fn main() {
    match skai_drv::parse_args(std::env::args().skip(1)) {
        Ok(config) => exit(skai_drv::run(&config)),
        Err(err) => {
            println!("{err}");
            exit(skai_drv::EXIT_USAGE);
        }
    }
}
