fn main() {
    apple_catcher::run();
}
