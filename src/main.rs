fn main() {
    if let Err(err) = phylo_render::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
