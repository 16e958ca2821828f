use intersection_convert::error::ConvertError;

fn main() {
    if let Err(err) = intersection_convert::run() {
        match err.downcast_ref::<ConvertError>() {
            Some(ConvertError::Usage(message)) => eprint!("{message}"),
            _ => eprintln!("error: {err:#}"),
        }
        std::process::exit(1);
    }
}
