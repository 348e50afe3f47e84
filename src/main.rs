fn main() {
    arcade_combat::game::run();
}
