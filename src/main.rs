fn main() {
    yabai3::cli::run();
}
