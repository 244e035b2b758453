fn main() {
    dielec_tasks::entry_points::dielec();
}
