#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Command {
    SetExhaustFan { on: bool },
    SyncMultiFunctionModule,
}
