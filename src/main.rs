fn main() {
    pathology_report_lib::run()
}
