fn main() {
    pyrelight::game::run();
}
